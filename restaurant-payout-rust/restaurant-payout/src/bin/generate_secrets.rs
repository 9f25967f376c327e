use restaurant_payout::domain::auth::AuthManager;

use base64::Engine;

fn main() {
    println!("Generating production secrets for Restaurant Payout...");

    let mut secrets: Vec<(String, String)> = AuthManager::generate_production_secrets().into_iter().collect();
    secrets.sort();
    println!("✅ Successfully generated production secrets:");
    println!();

    println!("# .env");
    for (key, value) in &secrets {
        println!("{}={}", key, value);
    }

    println!();
    println!("# base64, for secret manifests");
    for (key, value) in &secrets {
        println!("  {}: {}", key, base64::engine::general_purpose::STANDARD.encode(value));
    }

    println!();
    println!("🔐 Store these secrets securely in your production environment.");
    println!("⚠️  Never commit these secrets to version control!");
}
