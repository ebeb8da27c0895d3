use std::{
    error::Error,
    io::{self},
    path::Path,
    process::exit,
};

use clap::Parser;
use rusqlite::Connection;

use finance_tracker::{UserId, initialize_db, register_api_token};

/// A utility for accepting an identity provider's token for a user.
///
/// The token is read from the terminal without echoing it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The identity provider's ID for the user the token belongs to.
    #[arg(long)]
    user_id: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);

    let user_id = args.user_id.trim();
    if user_id.is_empty() {
        print_error("The user ID cannot be empty.");
        exit(1);
    }

    let Some(token) = read_token() else {
        return Ok(());
    };

    let connection = Connection::open(db_path)?;
    initialize_db(&connection)?;
    register_api_token(&UserId::new(user_id), &token, &connection)?;

    println!("Token registered for user {user_id}.");

    Ok(())
}

fn read_token() -> Option<String> {
    loop {
        let token = match rpassword::prompt_password("Enter the API token: ") {
            Ok(string) => string,
            Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => {
                return None;
            }
            Err(error) => {
                print_error(format!("Could not read token from stdin: {error}"));
                return None;
            }
        };

        if token.trim().is_empty() {
            print_error("The token cannot be empty, try again.");
            continue;
        }

        return Some(token);
    }
}

fn print_error(error: impl ToString) {
    eprintln!("\x1b[31;1m{}\x1b[0m", error.to_string())
}
