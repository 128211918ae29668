use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use schoolhouse_cli::seeder::{self, SeedConfig};
use schoolhouse_config::{DatabaseConfig, StoreBackend};
use schoolhouse_db::Store;

#[derive(Parser)]
#[command(name = "schoolhouse-cli")]
#[command(about = "Schoolhouse CLI - Administrative tools for Schoolhouse", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new administrator account
    CreateAdmin {
        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the default admin plus fake teachers, students, parents and classes
    Seed {
        /// Number of teachers (one class each)
        #[arg(long, default_value = "4")]
        teachers: usize,

        /// Number of students
        #[arg(long, default_value = "40")]
        students: usize,

        /// Number of parents, each linked to one student
        #[arg(long, default_value = "20")]
        parents: usize,

        /// Capacity of every seeded class
        #[arg(long, default_value = "15")]
        capacity: u32,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = DatabaseConfig::from_env().unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    });

    if config.backend == StoreBackend::Memory {
        eprintln!("⚠️  DATABASE_URL selects the in-memory store; nothing will be persisted.");
    }

    let store = Store::connect(&config).await.unwrap_or_else(|e| {
        eprintln!("❌ Failed to connect to database: {}", e);
        std::process::exit(1);
    });

    let cli = Cli::parse();

    match cli.command {
        Commands::CreateAdmin {
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&store, first_name, last_name, email, password).await,
        Commands::Seed {
            teachers,
            students,
            parents,
            capacity,
        } => {
            let config = SeedConfig {
                teachers,
                students,
                parents,
                class_capacity: capacity,
            };
            handle_seed(&store, config).await
        }
    }
}

fn prompt(label: &str) -> String {
    Input::new()
        .with_prompt(label)
        .interact_text()
        .unwrap_or_else(|e| {
            eprintln!("❌ Failed to read {}: {}", label.to_lowercase(), e);
            std::process::exit(1);
        })
}

async fn handle_create_admin(
    store: &Store,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) {
    let first_name = first_name.unwrap_or_else(|| prompt("First name"));
    let last_name = last_name.unwrap_or_else(|| prompt("Last name"));
    let email = email.unwrap_or_else(|| prompt("Email address"));

    let password = password.unwrap_or_else(|| {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .unwrap_or_else(|e| {
                eprintln!("❌ Failed to read password: {}", e);
                std::process::exit(1);
            })
    });

    match seeder::create_admin(store, &first_name, &last_name, &email, &password).await {
        Ok(admin) => {
            println!("\n✅ Admin created successfully!");
            println!("   Email: {}", admin.email);
            println!("   Name: {}", admin.full_name());
        }
        Err(e) => {
            eprintln!("\n❌ Error creating admin: {}", e);
            std::process::exit(1);
        }
    }
}

async fn handle_seed(store: &Store, config: SeedConfig) {
    match seeder::seed_all(store, config).await {
        Ok(summary) => {
            println!("✅ Seeding complete");
            println!("   Admins:   {}", summary.admins);
            println!("   Teachers: {}", summary.teachers);
            println!("   Students: {}", summary.students);
            println!("   Parents:  {}", summary.parents);
            println!("   Classes:  {}", summary.classes);
            println!(
                "   Demo users sign in with password '{}'",
                seeder::users::DEMO_PASSWORD
            );
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding database: {}", e);
            std::process::exit(1);
        }
    }
}
