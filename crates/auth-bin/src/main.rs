// ============================
// crates/auth-bin/src/main.rs
// ============================
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pharmacy_auth::{
    auth::{AuthService, PasswordHasher},
    config::Settings,
    logging, AppState,
};
use pharmacy_common::Role;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use zeroize::Zeroize;

/// Pharmacy account login and credential tools
#[derive(Parser, Debug)]
#[command(name = "pharmacy-auth", version)]
struct Cli {
    /// Configuration file (defaults to ./pharmacy-auth.toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in, reading a username line then a password line from stdin until one succeeds
    Login {
        /// admin, patient, doctor or pharmacist
        #[arg(long, short)]
        role: Role,
    },
    /// Print the canonical stored credential for a password read from stdin
    Hash,
    /// Count accounts still holding plaintext credentials
    Audit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Settings::load()?,
    };
    logging::init(&settings)?;
    tracing::debug!(?settings, "settings loaded");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    match cli.command {
        Command::Login { role } => {
            let state = AppState::from_settings(settings).await?;
            login(&state, role, &mut stdin).await
        },
        Command::Hash => {
            let hasher = PasswordHasher::new().context("password hasher self-test failed")?;
            let Some(mut password) = read_line(&mut stdin).await? else {
                bail!("no password on stdin");
            };
            println!("{}", hasher.hash_secure(&mut password)?);
            Ok(())
        },
        Command::Audit => {
            let state = AppState::from_settings(settings).await?;
            for (role, count) in state.auth.directory().plaintext_report() {
                println!("{role}: {count} plaintext credential(s)");
            }
            Ok(())
        },
    }
}

async fn login<S>(state: &AppState<S>, role: Role, stdin: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<()>
where
    S: pharmacy_auth::storage::AccountStore,
{
    loop {
        eprint!("username: ");
        let Some(username) = read_line(stdin).await? else {
            break;
        };
        eprint!("password: ");
        let Some(mut password) = read_line(stdin).await? else {
            break;
        };

        let outcome = state.auth.login(role, &username, &password);
        password.zeroize();

        match outcome {
            Ok(user) => {
                // a legacy credential may just have been rehashed
                state.persist().await?;
                println!("logged in as {} ({}, id {})", user.username, user.role, user.id);
                return Ok(());
            },
            Err(e) if e.is_auth_rejection() => eprintln!("{}", e.sanitized_message()),
            Err(e) => return Err(e.into()),
        }
    }

    bail!("no successful login")
}

async fn read_line(stdin: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Option<String>> {
    let line = stdin.next_line().await?;
    Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
}
