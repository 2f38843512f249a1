use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use zenforge::{
    AssumeYes, Collaborators, ConsentController, ConsolePrompt, FontController, PreferenceSet,
    Prompt, RestoreController, Result, RunState, StdFilesystem, ZenforgeConfig,
};

mod cli;
use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli);

    let result = match cli.command {
        Commands::Apply {
            yes,
            profile,
            no_neovim,
        } => {
            let config = if no_neovim {
                ZenforgeConfig {
                    apply_neovim_settings: false,
                    ..config
                }
            } else {
                config
            };
            handle_apply(&config, profile.as_deref(), yes)
        }
        Commands::Restore { yes } => handle_restore(&config, yes),
        Commands::InstallFonts => handle_install_fonts(&config),
        Commands::Backup => handle_backup(&config),
        Commands::Profile { profile } => handle_profile(profile.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

/// `warn` by default, `-v` for info, `-vv` for debug; `RUST_LOG` wins
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn build_config(cli: &Cli) -> ZenforgeConfig {
    let mut builder = ZenforgeConfig::builder();
    if let Some(path) = &cli.settings {
        builder = builder.user_settings(path);
    }
    if let Some(path) = &cli.workspace_settings {
        builder = builder.workspace_settings(path);
    }
    if let Some(path) = &cli.state {
        builder = builder.state_file(path);
    }
    if let Some(path) = &cli.fonts {
        builder = builder.fonts_dir(path);
    }
    if let Some(path) = &cli.font_destination {
        builder = builder.font_destination(path);
    }
    if let Some(editor) = &cli.editor {
        builder = builder.editor_command(editor);
    }
    builder.build()
}

fn console(yes: bool) -> Box<dyn Prompt> {
    if yes {
        Box::new(AssumeYes::new(ConsolePrompt::stdio()))
    } else {
        Box::new(ConsolePrompt::stdio())
    }
}

fn load_profile(path: Option<&Path>) -> Result<PreferenceSet> {
    match path {
        Some(path) => PreferenceSet::from_path(path),
        None => PreferenceSet::bundled(),
    }
}

fn handle_apply(config: &ZenforgeConfig, profile: Option<&Path>, yes: bool) -> Result<ExitCode> {
    let profile = load_profile(profile)?;

    let mut store = config.settings_store();
    let mut state = config.state_slot();
    let mut registry = config.editor_cli();
    let mut prompt = console(yes);
    let mut fs = StdFilesystem;

    let report = ConsentController::new(
        Collaborators {
            store: &mut store,
            state: &mut state,
            registry: &mut registry,
            prompt: prompt.as_mut(),
            fs: &mut fs,
        },
        config,
    )
    .run(&profile);

    Ok(match report.state() {
        RunState::Failed => match &report.backup {
            Some(Err(e)) => ExitCode::from(e.exit_code()),
            _ => ExitCode::FAILURE,
        },
        _ => ExitCode::SUCCESS,
    })
}

fn handle_restore(config: &ZenforgeConfig, yes: bool) -> Result<ExitCode> {
    let mut store = config.settings_store();
    let mut state = config.state_slot();
    let mut prompt = console(yes);

    // The controller has already told the user what happened
    Ok(match RestoreController::new(&mut store, &mut state, prompt.as_mut()).run() {
        Ok(result) if result.failures().is_empty() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => ExitCode::from(e.exit_code()),
    })
}

fn handle_install_fonts(config: &ZenforgeConfig) -> Result<ExitCode> {
    let mut fs = StdFilesystem;
    let mut prompt = ConsolePrompt::stdio();

    let result = FontController::new(&mut fs, &mut prompt)
        .run(&config.fonts_dir, config.font_destination());
    Ok(match result {
        Ok(outcome) if outcome.is_complete() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => ExitCode::from(e.exit_code()),
    })
}

fn handle_backup(config: &ZenforgeConfig) -> Result<ExitCode> {
    let mut state = config.state_slot();
    match zenforge::BackupStore::new(&mut state).load()? {
        Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        None => println!("No settings backup stored in {}", config.state_file.display()),
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_profile(path: Option<&Path>) -> Result<ExitCode> {
    let profile = load_profile(path)?;
    println!("{} (version {})", profile.name(), profile.version());
    for entry in &profile {
        println!("  {:<8} {}", entry.group.as_str(), entry.key);
    }
    Ok(ExitCode::SUCCESS)
}
