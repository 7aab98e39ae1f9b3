use clap::Parser;
use fixtures::auth::{mint_session_token, TEST_PUBLIC_KEY_PEM};

/// Print a session token signed with the fixture key, for calling the admin API locally.
///
/// Run the storefront with `AUTH_ALGORITHM=ES256` and `AUTH_PUBLIC_KEY` set to the
/// base64 of the key printed by `--print-public-key`.
#[derive(Parser, Debug)]
#[clap(name = "mint-token")]
struct Cli {
    /// Subject (user id) of the token
    #[arg(short, long, default_value = "user_fixture_admin")]
    user: String,

    /// Issuer claim, if the storefront checks one
    #[arg(short, long)]
    issuer: Option<String>,

    /// Lifetime in seconds
    #[arg(short, long, default_value = "3600")]
    ttl: i64,

    /// Print the fixture public key instead of a token
    #[arg(long)]
    print_public_key: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.print_public_key {
        print!("{TEST_PUBLIC_KEY_PEM}");
        return;
    }

    println!(
        "{}",
        mint_session_token(&cli.user, cli.issuer.as_deref(), cli.ttl)
    );
}
