use actix_web::{web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use vless2sub::settings::init_settings;
use vless2sub::storage::MemoryStore;
use vless2sub::utils::RemoteTemplates;
use vless2sub::web_handlers::interfaces::{self, not_found_handler};
use vless2sub::{AppState, Settings};

/// Convert VLESS links into sing-box and Clash subscriptions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address (e.g., 127.0.0.1 or 0.0.0.0)
    #[arg(short, long, value_name = "ADDRESS")]
    address: Option<String>,

    /// Listen port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// File of VLESS links to convert directly instead of starting the server
    #[arg(long, value_name = "FILE")]
    input: Option<String>,

    /// Output format for direct conversion (singbox or clash)
    #[arg(short, long, value_name = "TARGET", default_value = "singbox")]
    target: String,

    /// Output file path for direct conversion (must be used with --input)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Check if only one of input or output is provided
    if args.input.is_some() != args.output.is_some() {
        eprintln!("Error: --input and -o/--output must be used together");
        std::process::exit(1);
    }

    // Initialize settings with config file path if provided
    let settings_result = init_settings(args.config.as_deref().unwrap_or(""));
    let mut settings = (*Settings::current()).clone();

    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or(settings.log_level.as_str()));
    if let Err(e) = settings_result {
        error!("{}", e);
        std::process::exit(1);
    }

    if let (Some(input), Some(output)) = (args.input, args.output) {
        info!("Converting {} to {} as {}", input, output, args.target);

        let raw = std::fs::read_to_string(&input)?;
        let app_state = AppState::from_settings(&settings);
        let artifact = match app_state.converter.convert_selector(&raw, &args.target).await {
            Ok(artifact) => artifact,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        };
        if artifact.is_error() {
            warn!("Conversion produced an error document");
        }
        std::fs::write(&output, artifact.into_body())?;
        info!("Successfully wrote subscription to {}", output);
        return Ok(());
    }

    // Override settings with command line arguments if provided
    if let Some(address) = args.address {
        settings.server.listen_address = address;
    }
    if let Some(port) = args.port {
        settings.server.listen_port = port;
    }
    let listen_address = settings.listen_address();
    let app_state = web::Data::new(AppState::from_settings(&settings));

    info!("vless2sub starting on {}", listen_address);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(interfaces::config::<RemoteTemplates, MemoryStore>)
            .default_service(web::to(not_found_handler))
    })
    .bind(listen_address)?
    .workers(settings.server.max_concur_threads)
    .run()
    .await
}
