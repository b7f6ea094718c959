use clap::{Arg, Command};
use diesel::{Connection, PgConnection};
use research_hub::{
    config::Config,
    db::enums::UserRole,
    db::models::user::{NewUser, UserChanges},
    db::repositories::users::UsersRepo,
    error::{AppError, AppResult},
    validation::auth::validate_email,
    validation::rules::normalize_email,
};

fn main() {
    let matches = Command::new("seed_admin")
        .about("Creates a superadmin account, or promotes an existing one")
        .arg(
            Arg::new("email")
                .long("email")
                .value_name("EMAIL")
                .help("Account email")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .value_name("PASSWORD")
                .help("Password for a newly created account")
                .required(true),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Display name for a newly created account")
                .default_value("Super Admin"),
        )
        .arg(
            Arg::new("reset-password")
                .long("reset-password")
                .help("Also overwrite the password of an existing account")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let email = matches.get_one::<String>("email").cloned().unwrap_or_default();
    let password = matches.get_one::<String>("password").cloned().unwrap_or_default();
    let name = matches.get_one::<String>("name").cloned().unwrap_or_default();
    let reset_password = matches.get_flag("reset-password");

    tracing_subscriber::fmt::init();

    match run(&email, &password, &name, reset_password) {
        Ok(message) => println!("{}", message),
        Err(e) => {
            eprintln!("seed_admin failed: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(email: &str, password: &str, name: &str, reset_password: bool) -> AppResult<String> {
    let config = Config::from_env()?;
    let email = normalize_email(email);
    validate_email(&email)?;
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let mut conn = PgConnection::establish(&config.database_url)
        .map_err(|e| AppError::Config(format!("Cannot connect to database: {}", e)))?;

    conn.transaction::<_, AppError, _>(|tx| match UsersRepo::find_by_email(tx, &email)? {
        Some(existing) => {
            let mut changes = UserChanges {
                role: Some(UserRole::Superadmin),
                updated_at: Some(chrono::Utc::now()),
                ..Default::default()
            };
            if reset_password {
                changes.password_hash = Some(bcrypt::hash(password, config.bcrypt_cost)?);
            }
            UsersRepo::update(tx, existing.id, &changes)?;
            tracing::info!(user_id = %existing.id, "Promoted existing account to superadmin");
            Ok(format!("Promoted {} to superadmin", email))
        }
        None => {
            let user = UsersRepo::insert(
                tx,
                &NewUser {
                    name: name.trim().to_string(),
                    email: email.clone(),
                    password_hash: bcrypt::hash(password, config.bcrypt_cost)?,
                    role: UserRole::Superadmin,
                    notify_email_on_article: config.notify_email_on_article,
                },
            )?;
            tracing::info!(user_id = %user.id, "Created superadmin account");
            Ok(format!("Created superadmin {}", email))
        }
    })
}
