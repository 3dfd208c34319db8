// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use spa_prerender::application::use_cases::generate_site::GenerateSiteUseCase;
use spa_prerender::application::use_cases::jsonjsdb_site::generate_jsonjsdb_static_site;
use spa_prerender::config::settings::Settings;
use spa_prerender::domain::models::capture::RunReport;
use spa_prerender::domain::models::route::Route;
use spa_prerender::domain::models::site_config::SsgConfig;
use spa_prerender::domain::services::capture_service::CaptureOptions;
use spa_prerender::engines::chromium_engine::ChromiumLauncher;
use spa_prerender::utils::errors::AdapterError;
use spa_prerender::utils::telemetry;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "spa-prerender")]
#[command(about = "Pre-render single-page application routes to static HTML")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a jsonjsdb site from a JSON configuration file
    Jsonjsdb {
        /// Path to the configuration file
        config: PathBuf,

        /// Directory the configuration and its relative paths resolve against
        #[arg(long)]
        working_dir: Option<PathBuf>,
    },

    /// Capture an explicit list of routes
    Routes {
        /// Site domain used for the sitemap
        #[arg(long)]
        domain: String,

        /// Port for the temporary static server
        #[arg(long)]
        port: u16,

        /// Output directory, relative to the app path
        #[arg(long)]
        out_dir: PathBuf,

        /// Site root containing the built application
        #[arg(long, default_value = ".")]
        app_path: PathBuf,

        /// Allow search engine indexing (implies a sitemap)
        #[arg(long)]
        index_seo: bool,

        /// Emit sitemap.xml after capturing
        #[arg(long)]
        sitemap: bool,

        /// Routes to capture, without leading slash ("" for the index page)
        routes: Vec<String>,
    },
}

fn summarize(report: &RunReport) {
    info!("{} of {} pages written", report.written, report.pages);
    for route in &report.failed {
        warn!("Not captured: {}", route.display_name());
    }
}

/// 主函数
///
/// 解析命令行参数，加载运行时配置并执行对应的生成流程
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    telemetry::init_telemetry();

    let cli = Cli::parse();
    let settings = Settings::new()?;
    info!("Configuration loaded");

    let launcher = Arc::new(ChromiumLauncher::new(settings.browser.clone()));
    let use_case = GenerateSiteUseCase::new(launcher, settings);

    let report = match cli.command {
        Commands::Jsonjsdb {
            config,
            working_dir,
        } => {
            match generate_jsonjsdb_static_site(&use_case, &config, working_dir.as_deref()).await
            {
                Ok(report) => report,
                Err(AdapterError::ConfigUnavailable) => return Ok(ExitCode::FAILURE),
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Routes {
            domain,
            port,
            out_dir,
            app_path,
            index_seo,
            sitemap,
            routes,
        } => {
            let mut config = SsgConfig::new(domain, port, app_path).with_out_dir(out_dir);
            config.index_seo = index_seo;
            config.generate_sitemap = sitemap;

            let routes: Vec<Route> = if routes.is_empty() {
                vec![Route::default()]
            } else {
                routes.into_iter().map(Route::from).collect()
            };

            use_case
                .execute(&routes, &config, CaptureOptions::default())
                .await?
        }
    };

    summarize(&report);
    Ok(ExitCode::SUCCESS)
}
