mod calendar;
mod data;
mod encoder;
mod error;
mod extract;
mod model;
mod roster;
mod server;
mod solver;
mod variables;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    server::run_server().await
}
