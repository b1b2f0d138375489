use std::io::{BufRead, Write};
use std::path::PathBuf;

use ataasil::AppContext;
use ataasil::build_context;
use ataasil::error::{AppResult, run_with_error_handler};
use ataasil::model::entity::{LoginInput, RegisterInput};
use ataasil::tracker::CourseOverview;
use ataasil::utils::embed::embed_url;
use ataasil::utils::signal::cancel_on_ctrl_c;
use clap::{Parser, Subcommand};

/// Password source checked before prompting on stdin.
static PASSWORD_ENV: &str = "ATAASIL_PASSWORD";

#[derive(Parser, Debug)]
#[command(about = "Command-line client for the Ataasil e-learning platform", long_about = None)]
pub struct Cli {
    /// Read ./config.toml instead of the user config directory
    #[arg(long, global = true)]
    pub local: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and persist the session. The password is taken from
    /// ATAASIL_PASSWORD or prompted for
    Login {
        #[arg(long)]
        email: String,
    },

    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "student")]
        role: String,
        /// Required for admin registration
        #[arg(long)]
        secret: Option<String>,
    },

    /// Drop the persisted session
    Logout,

    /// Show the current user
    Whoami,

    /// Browse courses
    Courses {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Show progress, for one course or all of them
    Progress {
        #[arg(long)]
        course: Option<String>,
    },

    /// Mark a video as completed
    Complete { course: String, video: String },

    /// Generate, download, verify and list certificates
    Certificate {
        #[command(subcommand)]
        action: CertificateCommands,
    },

    /// Print the navigation decision for a path
    Guard { path: String },
}

/// Course browsing
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    List,
    Show { id: String },
}

/// Certificate management
#[derive(Subcommand, Debug)]
pub enum CertificateCommands {
    Generate {
        course: String,
    },
    Download {
        id: String,
        /// Target directory, defaults to the configured downloads dir
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    Verify {
        id: String,
    },
    List {
        /// Every certificate visible to this session, not only your own
        #[arg(long, default_value_t = false)]
        all: bool,
    },
}

/// `from_env` when set, otherwise one line from `input` after a prompt.
fn resolve_password<R: BufRead>(from_env: Option<String>, mut input: R) -> AppResult<String> {
    if let Some(password) = from_env.filter(|p| !p.is_empty()) {
        return Ok(password);
    }

    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_password() -> AppResult<String> {
    resolve_password(std::env::var(PASSWORD_ENV).ok(), std::io::stdin().lock())
}

fn print_overview(overview: &CourseOverview) {
    let progress = overview.progress();
    println!(
        "{} [{}] {}% ({}/{} videos){}",
        overview.course().title(),
        overview.course().id(),
        progress.percentage(),
        progress.completed_count(),
        progress.total_count(),
        if overview.eligible() {
            " - certificate available"
        } else {
            ""
        }
    );
}

async fn execute(ctx: &AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Login { email } => {
            let password = read_password()?;
            let user = ctx.login(LoginInput { email, password }).await?;
            println!("Logged in as {} <{}> ({})", user.name(), user.email(), user.role());
        }

        Commands::Register {
            name,
            email,
            role,
            secret,
        } => {
            let password = read_password()?;
            let user = ctx
                .register(RegisterInput {
                    name,
                    email,
                    password,
                    role,
                    secret,
                })
                .await?;
            println!("Account created for {}. You can log in now.", user.email());
        }

        Commands::Logout => {
            ctx.logout().await?;
            println!("Logged out.");
        }

        Commands::Whoami => {
            let user = ctx.refresh_user().await?;
            println!("{} <{}> ({})", user.name(), user.email(), user.role());
        }

        Commands::Courses { action } => match action {
            CourseCommands::List => {
                for course in ctx.courses().await? {
                    println!(
                        "{}  {} ({} videos)",
                        course.id(),
                        course.title(),
                        course.videos().len()
                    );
                }
            }
            CourseCommands::Show { id } => {
                let overview = ctx.course_overview(&id).await?;
                print_overview(&overview);
                println!("{}", overview.course().description());
                for video in overview.course().videos() {
                    let mark = if overview.progress().is_video_completed(video.id()) {
                        "x"
                    } else {
                        " "
                    };
                    println!("  [{mark}] {}  {}  {}", video.id(), video.title(), embed_url(video.url()));
                }
            }
        },

        Commands::Progress { course } => match course {
            Some(course) => print_overview(&ctx.course_overview(&course).await?),
            None => {
                for overview in ctx.dashboard().await? {
                    print_overview(&overview);
                }
            }
        },

        Commands::Complete { course, video } => {
            let overview = ctx.mark_video_completed(&course, &video).await?;
            print_overview(&overview);
        }

        Commands::Certificate { action } => match action {
            CertificateCommands::Generate { course } => {
                let generated = ctx.generate_certificate(&course).await?;
                println!("Certificate ID: {}", generated.certificate_id);
                println!("Download: {}", generated.download_path());
                println!("Verify:   {}", generated.verify_path());
            }
            CertificateCommands::Download { id, dir } => {
                let path = ctx.download_certificate(&id, dir.as_deref()).await?;
                println!("Saved {}", path.display());
            }
            CertificateCommands::Verify { id } => match ctx.verify_certificate(&id).await? {
                ataasil::context::Verification::Valid(data) => {
                    println!("Valid certificate {}", data.certificate_id);
                    println!("  student: {}", data.student_name);
                    println!("  course:  {}", data.course_name);
                    if let Some(issued_at) = data.issued_at {
                        println!("  issued:  {}", issued_at.format("%Y-%m-%d"));
                    }
                }
                ataasil::context::Verification::Invalid { certificate_id } => {
                    println!(
                        "Invalid certificate: {certificate_id} is not valid or does not exist in our records."
                    );
                }
            },
            CertificateCommands::List { all } => {
                let certificates = if all {
                    ctx.all_certificates().await?
                } else {
                    ctx.my_certificates().await?
                };
                for certificate in certificates {
                    let course = certificate
                        .course()
                        .and_then(|c| c.title())
                        .unwrap_or(certificate.course_id());
                    println!("{}  {}", certificate.certificate_id(), course);
                }
            }
        },

        Commands::Guard { path } => {
            let decision = ctx.navigate(&path).await;
            let role = ctx.check_role(&path).await;
            match (decision.redirect_target(), role.redirect_target()) {
                (Some(target), _) => println!("{path}: {decision} ({target})"),
                (None, Some(target)) => println!("{path}: role check failed, redirect to {target}"),
                (None, None) => println!("{path}: {decision}"),
            }
        }
    }

    Ok(())
}

async fn run() -> AppResult<()> {
    let args = Cli::parse();
    let ctx = build_context(args.local).await?;

    let shutdown = ctx.shutdown_token();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    let result = execute(&ctx, args.command).await;
    shutdown.cancel();
    result
}

#[tokio::main]
#[tracing::instrument]
async fn main() {
    ataasil::setup_trace();
    run_with_error_handler(run).await;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn password_is_not_an_argument() {
        let cli = Cli::try_parse_from(["ataasil", "login", "--email", "amina@example.com"]).unwrap();
        assert!(matches!(cli.command, Commands::Login { ref email } if email == "amina@example.com"));

        let result = Cli::try_parse_from([
            "ataasil",
            "login",
            "--email",
            "amina@example.com",
            "--password",
            "secret123",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn password_from_env_or_input() {
        let password = resolve_password(Some("from-env".into()), &b"typed\n"[..]).unwrap();
        assert_eq!(password, "from-env");

        let password = resolve_password(None, &b"typed\r\n"[..]).unwrap();
        assert_eq!(password, "typed");

        let password = resolve_password(Some(String::new()), &b"typed\n"[..]).unwrap();
        assert_eq!(password, "typed");
    }
}
