/*

Copyright 2025 Lealt

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.

*/

use dotenvy::dotenv;

mod commands;
mod config;
mod constants;
mod database;
mod duel;
mod env;
mod functions;

pub use duel::{Context, Data, Error};

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), duel::Error> {
    dotenv().ok();
    init_tracing(&env::log_level()?);

    let token = env::discord_token()?;
    let intents = config::gateway_intents();
    let prefix_options = config::prefix_options();
    let database = database::connect()
        .await
        .map_err(|err| -> duel::Error { Box::new(err) })?;
    tracing::info!("database ready");

    let framework = duel::build_framework(prefix_options, database);
    duel::run_client(token, intents, framework).await
}
