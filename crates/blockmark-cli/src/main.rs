use anyhow::{Context, Result};
use blockmark_config::{Config, PlatformSetting};
use blockmark_engine::editing::{
    EditorSession, EditorState, InteractionController, Platform, SelectionMapper, UploadLimits,
};
use blockmark_engine::{blocks_to_persisted, io};
use std::path::{Path, PathBuf};
use std::{env, fs, process};

mod host;
mod script;

use script::{ScriptRunner, parse_script};

struct Args {
    document: PathBuf,
    script: Option<PathBuf>,
    write: bool,
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [--write] <document.json> [script]")
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut write = false;
    let mut positional = Vec::new();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--write" | "-w" => write = true,
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let document = positional.next()?;
    let script = positional.next();
    if positional.next().is_some() {
        return None;
    }
    Some(Args {
        document,
        script,
        write,
    })
}

fn session_from_config(state: EditorState, config: &Config) -> EditorSession {
    let platform = match config.editor.platform {
        PlatformSetting::Auto => Platform::current(),
        PlatformSetting::Mac => Platform::Mac,
        PlatformSetting::Other => Platform::Other,
    };
    let controller =
        InteractionController::new(platform, SelectionMapper::new(config.editor.toolbar_offset));
    let limits = UploadLimits {
        max_bytes: config.upload.max_bytes,
        allowed_mime_types: config.upload.allowed_mime_types.clone(),
    };
    EditorSession::new(state, controller, limits)
}

fn run(args: Args, config: &Config) -> Result<()> {
    let document_path = config.resolve_document(&args.document);
    let blocks = io::read_document(&document_path)
        .with_context(|| format!("Failed to load {}", document_path.display()))?;
    let state = EditorState::new(blocks)?;
    log::info!(
        "Loaded {} ({} blocks)",
        document_path.display(),
        state.blocks().len()
    );

    let commands = match &args.script {
        Some(script_path) => {
            let script = fs::read_to_string(script_path)
                .with_context(|| format!("Failed to read script {}", script_path.display()))?;
            parse_script(&script)
                .with_context(|| format!("Invalid script {}", script_path.display()))?
        }
        None => Vec::new(),
    };

    let base_dir = document_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut runner = ScriptRunner::new(session_from_config(state, config), &base_dir);
    runner.run_all(commands)?;
    let (session, output) = runner.finish();
    print!("{output}");

    if args.write {
        io::write_document(&document_path, session.state().blocks())?;
    } else {
        let json = serde_json::to_string_pretty(&blocks_to_persisted(session.state().blocks()))?;
        println!("{json}");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("blockmark-cli");
    let Some(parsed) = parse_args(&args) else {
        eprintln!("{}", usage(program));
        process::exit(1);
    };

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Using config file {}", config_path.display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    run(parsed, &config)
}
