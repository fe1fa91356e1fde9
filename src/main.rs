use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tododo::app::{AppState, create_app, serve};
use tododo::config::TodoConfig;
use tododo::database::create_sqlite_database_on_disk;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SQLite database file holding all lists.
    #[arg(short, long, env = "DATABASE_PATH", default_value = "database.sqlite3")]
    database_path: PathBuf,

    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// TOML file with the items new lists are seeded with.
    #[arg(long, env = "TODO_CONFIG")]
    config: Option<PathBuf>,

    #[arg(short, long, env = "KEY_FILE_PATH", requires = "cert_file_path")]
    key_file_path: Option<String>,

    #[arg(short, long, env = "CERT_FILE_PATH", requires = "key_file_path")]
    cert_file_path: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args = Args::parse();

    let config = match args.config {
        Some(path) => TodoConfig::read(&path).expect("failed to read config"),
        None => TodoConfig::default(),
    };

    log::info!("using database {}", args.database_path.display());
    let database_connection = Arc::new(Mutex::new(
        create_sqlite_database_on_disk(&args.database_path)
            .expect("failed to create sqlite database"),
    ));

    let app = create_app(AppState {
        database_connection,
        config: Arc::new(config),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    serve(app, addr, args.key_file_path.zip(args.cert_file_path))
        .await
        .expect("server failed");
}
