use clap::Parser;
use inventory_map::{cli, config, error, loader, logging, render, report};
use cli::{Cli, Commands};
use config::Config;
use error::{InventoryError, Result};
use inventory_map_common::coords::load_building_coordinates;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::load()?;
    if let Some(root) = &cli.site_root {
        config.site_root = root.clone();
    }
    if let Some(url) = &cli.api_url {
        config.set_api_url(url.clone());
    }

    match cli.command {
        Commands::Summary { filters, json } => {
            let loader = loader::Loader::new(&config, cli.xlsx.as_deref())?.with_progress(!json);
            let mut session = loader.open_session(config.registry()?, cli.building.as_deref()).await;
            session.set_filters(filters.to_filters());

            let view = session.view_model();
            let summary = report::SummaryReport::new(&session, &view);
            if json {
                println!("{}", summary.to_json()?);
            } else {
                print!("{}", summary.to_text());
            }
        }

        Commands::Room { code, json } => {
            let loader = loader::Loader::new(&config, cli.xlsx.as_deref())?.with_progress(!json);
            let mut session = loader.open_session(config.registry()?, cli.building.as_deref()).await;

            let detail = session
                .select_room(&code)
                .ok_or_else(|| InventoryError::RoomNotFound(code.clone()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print!("{}", report::room_text(&detail));
            }
        }

        Commands::Render { filters, output, select, no_embed, category_dots } => {
            let loader = loader::Loader::new(&config, cli.xlsx.as_deref())?.with_progress(true);
            let mut session = loader.open_session(config.registry()?, cli.building.as_deref()).await;
            session.set_filters(filters.to_filters());

            let view = session.view_model();
            let options = render::RenderOptions {
                select,
                embed_plan: !no_embed,
                category_dots,
            };
            let svg = render::render_svg(&session, &view, &config, &options)?;

            let output = output.unwrap_or_else(|| {
                std::path::PathBuf::from(format!("floor-{}.svg", session.active_key()))
            });
            std::fs::write(&output, svg)?;
            println!("✔ {}", session.stats_line(&view));
            println!("✔ SVGを保存: {}", output.display());
        }

        Commands::Buildings => {
            let registry = config.registry()?;
            let loader = loader::Loader::new(&config, None)?;
            let mut entries = Vec::new();
            for building in registry.iter() {
                let coords = load_building_coordinates(loader.transport(), building).await;
                entries.push((building.clone(), coords.len()));
            }
            print!("{}", report::buildings_text(&registry, &entries));
        }

        Commands::Config { set_api_url, clear_api_url, show } => {
            let mut stored = Config::load()?;

            if let Some(url) = set_api_url {
                stored.set_api_url(url);
                stored.save()?;
                println!("✔ API URLを設定しました");
            }

            if clear_api_url {
                stored.clear_api_url();
                stored.save()?;
                println!("✔ API URLを削除しました");
            }

            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!(
                    "  API URL: {}",
                    stored.api_url().unwrap_or_else(|| "未設定（フィクスチャを使用）".into())
                );
                println!("  サイトルート: {}", stored.site_root.display());
                println!(
                    "  既定の建物: {}",
                    stored.default_building.as_deref().unwrap_or("（レジストリの既定）")
                );
                println!(
                    "  建物レジストリ: {}",
                    stored
                        .buildings_file
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "組み込み".into())
                );
                let c = &stored.calibration;
                println!(
                    "  座標補正: x = x * {} + {}, y = y * {} + {}",
                    c.x_scale, c.x_offset, c.y_scale, c.y_offset
                );
                println!("  タイムアウト: {}秒", stored.timeout_seconds);
            }
        }
    }

    Ok(())
}
