use std::io::Read;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use art_observe::cli::{Cli, Commands};
use art_observe::config::Config;
use art_observe::gemini::GeminiClient;
use art_observe::server::{self, AppState};
use art_observe::{error, service};
use art_observe_common::{
    clean_prompt_text, normalize_hints, surface_fallback_hints, Catalog, HintRequest, Observation,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            bind,
            public_dir,
            model,
        } => {
            let mut config = Config::load().context("설정을 읽지 못했습니다")?;
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if let Some(dir) = public_dir {
                config.public_dir = dir;
            }
            if let Some(model) = model {
                config.model = model;
            }
            server::serve(config).await?;
        }

        Commands::Hints {
            catalog,
            analyses,
            id,
            free,
            public_dir,
        } => {
            let config = Config::load().context("설정을 읽지 못했습니다")?;
            run_hints(config, &catalog, analyses.as_deref(), &id, free, &public_dir).await?;
        }

        Commands::Normalize { input, prompt } => {
            let raw = match input {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("파일을 읽지 못했습니다: {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            if prompt {
                println!("{}", clean_prompt_text(&raw));
            } else {
                println!("{}", normalize_hints(&raw));
            }
        }

        Commands::Config { set_api_key, show } => {
            // 環境変数は混ぜずにファイルの内容だけを扱う
            let mut config = Config::load_from(&Config::config_path()?)?;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ API 키를 저장했습니다");
            }

            if show {
                println!("설정: {}", Config::config_path()?.display());
                println!("  모델: {}", config.model);
                println!("  API 주소: {}", config.api_base_url);
                println!("  바인드: {}", config.bind);
                println!("  정적 파일: {}", config.public_dir.display());
                println!(
                    "  타임아웃: {}",
                    if config.timeout_seconds == 0 {
                        "없음".to_string()
                    } else {
                        format!("{}초", config.timeout_seconds)
                    }
                );
                println!(
                    "  API 키: {}",
                    if config.api_key().is_some() { "설정됨" } else { "미설정" }
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_hints(
    config: Config,
    catalog_path: &Path,
    analyses_path: Option<&Path>,
    id: &str,
    free: String,
    public_dir: &Path,
) -> anyhow::Result<()> {
    let catalog = Catalog::from_files(catalog_path, analyses_path)
        .with_context(|| format!("카탈로그를 읽지 못했습니다: {}", catalog_path.display()))?;
    let artwork = catalog
        .find(id)
        .with_context(|| format!("작품을 찾을 수 없습니다: {}", id))?;
    let analysis = catalog.analysis_for(id);
    let observation = Observation {
        free,
        ..Default::default()
    };
    let request =
        HintRequest::for_artwork(artwork, artwork.image_url.clone(), &observation, analysis);

    println!("📝 {} ({})\n", artwork.title, artwork.artist);

    let state = AppState::new(config)?;
    let result: error::Result<String> = async {
        let client = GeminiClient::from_config(state.http.clone(), &state.config)?;
        let image = service::load_image(&state.http, &request.image_url, public_dir).await?;
        service::generate_hints(&client, &request, &image).await
    }
    .await;

    match result {
        Ok(hints) => println!("{}", hints),
        Err(e) => {
            tracing::warn!(error = %e, "AI hints failed, using local fallback");
            println!("{}", surface_fallback_hints(artwork, &observation, analysis));
        }
    }
    Ok(())
}
