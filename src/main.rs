use std::process;

use tonga::config::Config;
use tonga::engine::Engine;
use tonga::server::serve;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            process::exit(1);
        }
    };

    let engine = match Engine::new(&config) {
        Ok(engine) => engine,
        Err(err) => {
            tracing::error!("{}", err);
            process::exit(1);
        }
    };

    if let Err(err) = serve(engine, config.listen_addr).await {
        tracing::error!("{}", err);
        process::exit(1);
    }
}
