use restaurant_payout::domain::auth::{AuthManager, Role};
use restaurant_payout::infrastructure::config::Config;
use std::process::ExitCode;

fn usage() -> ExitCode {
    eprintln!("Usage: issue_token <subject-id> <restaurant|admin> [ttl-hours]");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (subject, role) = match (args.first(), args.get(1)) {
        (Some(subject), Some(role)) => (subject.clone(), role.clone()),
        _ => return usage(),
    };

    let role: Role = match role.parse() {
        Ok(role) => role,
        Err(e) => {
            eprintln!("❌ {}", e);
            return usage();
        }
    };

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ttl_hours = match args.get(2).map(|raw| raw.parse::<i64>()) {
        Some(Ok(hours)) if hours > 0 => hours,
        Some(_) => return usage(),
        None => config.security.token_ttl_hours,
    };

    match AuthManager::new(config.security.jwt_secret.clone(), ttl_hours).generate_token(&subject, role) {
        Ok(token) => {
            eprintln!("✅ {} token for '{}' valid for {}h", role, subject, ttl_hours);
            println!("{}", token);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Failed to issue token: {}", e);
            ExitCode::FAILURE
        }
    }
}
