//! Interactive shell.
//!
//! The session store is in-memory, so signing in only makes sense inside a
//! single process. The shell reads one command per line, prompts for
//! passwords and dish details on the following lines, and keeps going after
//! a failed command.

use std::io::Write;
use std::path::Path;

use secrecy::SecretString;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use cloud_kitchen_client::api::{DishImage, NewDish};
use cloud_kitchen_client::error::AppError;
use cloud_kitchen_client::models::{MenuQuery, OrderFilter};
use cloud_kitchen_client::services::admin;
use cloud_kitchen_client::session::{PresetIdentityProvider, ProviderIdentity};
use cloud_kitchen_client::state::AppState;
use cloud_kitchen_core::{DishId, DishType, Email, OrderId, OrderStatus, Price};

use super::render::{dashboard_lines, identity_line, order_line};
use super::{cart, menu};

const HELP: &str = "\
Account
  login <email>                 sign in (prompts for password)
  signup <email> <name>         create an account
  google <email> [name]         sign in with a Google account
  admin-login <email>           sign in to the admin area
  logout
  whoami
Shopping
  menu [category]               list dishes
  cart | add <id> | remove <id> | inc <id> | dec <id> | clear
  checkout                      place the cart as a cash-on-delivery order
  orders                        your orders
Admin
  dashboard
  admin-orders [status|all] [search]
  set-status <order-id> <status>
  add-dish                      prompts for the dish details
help | quit";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Quit,
    WhoAmI,
    Login { email: String },
    Signup { email: String, name: String },
    Google { email: String, name: Option<String> },
    AdminLogin { email: String },
    Logout,
    Menu { category: Option<String> },
    Cart,
    Add(DishId),
    Remove(DishId),
    Inc(DishId),
    Dec(DishId),
    Clear,
    Checkout,
    Orders,
    Dashboard,
    AdminOrders {
        status: Option<OrderStatus>,
        search: Option<String>,
    },
    SetStatus { id: OrderId, status: OrderStatus },
    AddDish,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(String),
}

impl ShellCommand {
    /// Parse one line. Blank lines parse to `None`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for unknown commands or missing arguments.
    pub fn parse(line: &str) -> Result<Option<Self>, ParseError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match name.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "whoami" => Self::WhoAmI,
            "logout" => Self::Logout,
            "login" => Self::Login {
                email: one(&args, "login <email>")?,
            },
            "admin-login" => Self::AdminLogin {
                email: one(&args, "admin-login <email>")?,
            },
            "signup" => match args.split_first() {
                Some((email, name)) if !name.is_empty() => Self::Signup {
                    email: (*email).to_string(),
                    name: name.join(" "),
                },
                _ => return Err(ParseError::Usage("signup <email> <name>")),
            },
            "google" => match args.split_first() {
                Some((email, name)) => Self::Google {
                    email: (*email).to_string(),
                    name: (!name.is_empty()).then(|| name.join(" ")),
                },
                None => return Err(ParseError::Usage("google <email> [name]")),
            },
            "menu" => Self::Menu {
                category: args.first().map(|c| (*c).to_string()),
            },
            "cart" => Self::Cart,
            "clear" => Self::Clear,
            "add" => Self::Add(DishId::new(one(&args, "add <dish-id>")?)),
            "remove" => Self::Remove(DishId::new(one(&args, "remove <dish-id>")?)),
            "inc" => Self::Inc(DishId::new(one(&args, "inc <dish-id>")?)),
            "dec" => Self::Dec(DishId::new(one(&args, "dec <dish-id>")?)),
            "checkout" => Self::Checkout,
            "orders" => Self::Orders,
            "dashboard" => Self::Dashboard,
            "admin-orders" => {
                let status = match args.first() {
                    None => None,
                    Some(s) if s.eq_ignore_ascii_case("all") => None,
                    Some(s) => Some(s.parse().map_err(ParseError::Invalid)?),
                };
                let search = args.get(1..).filter(|rest| !rest.is_empty());
                Self::AdminOrders {
                    status,
                    search: search.map(|rest| rest.join(" ")),
                }
            }
            "set-status" => match args.split_first() {
                Some((id, status)) if !status.is_empty() => Self::SetStatus {
                    id: OrderId::new(*id),
                    status: status.join(" ").parse().map_err(ParseError::Invalid)?,
                },
                _ => return Err(ParseError::Usage("set-status <order-id> <status>")),
            },
            "add-dish" => Self::AddDish,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn one(args: &[&str], usage: &'static str) -> Result<String, ParseError> {
    match args {
        [value] => Ok((*value).to_string()),
        _ => Err(ParseError::Usage(usage)),
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Line source for commands and follow-up prompts.
struct Input<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Input<R> {
    /// Print `label` and read the answer. `None` at end of input.
    async fn ask(&mut self, label: &str) -> Result<Option<String>, AppError> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    async fn require(&mut self, label: &str) -> Result<String, AppError> {
        self.ask(label)
            .await?
            .ok_or_else(|| AppError::BadRequest("Input ended".to_string()))
    }

    async fn password(&mut self) -> Result<SecretString, AppError> {
        Ok(SecretString::from(self.require("Password: ").await?))
    }
}

/// Run the shell on stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns `AppError::Io` if the terminal cannot be read. Command failures
/// are printed and do not end the shell.
pub async fn run(state: &AppState) -> Result<(), AppError> {
    run_with(state, BufReader::new(tokio::io::stdin())).await
}

async fn run_with<R: AsyncBufRead + Unpin>(state: &AppState, reader: R) -> Result<(), AppError> {
    let mut input = Input {
        lines: reader.lines(),
    };
    println!("{}", identity_line(state.session().lock().await.identity()));
    println!("Type `help` for commands.");

    while let Some(line) = input.ask("kitchen> ").await? {
        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match execute(state, &mut input, command).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => {
                e.report();
                println!("{}", e.user_message());
            }
        }
    }
    Ok(())
}

#[allow(clippy::too_many_lines)]
async fn execute<R: AsyncBufRead + Unpin>(
    state: &AppState,
    input: &mut Input<R>,
    command: ShellCommand,
) -> Result<Flow, AppError> {
    match command {
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => return Ok(Flow::Quit),
        ShellCommand::WhoAmI => {
            println!("{}", identity_line(state.session().lock().await.identity()));
        }
        ShellCommand::Login { email } => {
            let password = input.password().await?;
            let user = state
                .session()
                .lock()
                .await
                .login_with_backend(&email, password)
                .await?;
            let name = user
                .display_name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| user.email.to_string());
            println!("Welcome back, {name}");
        }
        ShellCommand::Signup { email, name } => {
            let password = input.password().await?;
            let phone = input.ask("Phone (optional): ").await?.filter(|p| !p.is_empty());
            state
                .session()
                .lock()
                .await
                .signup_with_backend(&email, password, &name, phone)
                .await?;
            println!("Account created. Welcome, {name}");
        }
        ShellCommand::Google { email, name } => {
            let email = Email::parse(&email).map_err(|e| AppError::BadRequest(e.to_string()))?;
            let display_name = name.unwrap_or_else(|| email.as_str().to_string());
            let provider = PresetIdentityProvider::signed_in(ProviderIdentity {
                uid: email.to_string(),
                email,
                display_name,
                photo_url: None,
                id_token: None,
            });
            let mut session = state.session().lock().await;
            session.login_with_google(&provider).await?;
            println!("{}", identity_line(session.identity()));
        }
        ShellCommand::AdminLogin { email } => {
            let password = input.password().await?;
            state
                .session()
                .lock()
                .await
                .login_as_admin(&email, password)
                .await?;
            println!("Signed in as admin");
        }
        ShellCommand::Logout => {
            state.session().lock().await.logout();
            println!("Signed out");
        }
        ShellCommand::Menu { category } => {
            let query = MenuQuery {
                category,
                ..MenuQuery::default()
            };
            menu::list(state, &query).await?;
        }
        ShellCommand::Cart => cart::show(state).await,
        ShellCommand::Add(id) => cart::add(state, &id).await?,
        ShellCommand::Remove(id) => cart::remove(state, &id).await,
        ShellCommand::Inc(id) => cart::change(state, &id, 1).await,
        ShellCommand::Dec(id) => cart::change(state, &id, -1).await,
        ShellCommand::Clear => cart::clear(state).await,
        ShellCommand::Checkout => {
            if state.session().lock().await.identity().customer().is_none() {
                println!("Please log in to place an order");
                return Ok(Flow::Continue);
            }
            match state.checkout().await? {
                Some(order) => println!("Order placed: {}", order_line(&order)),
                None => println!("Order placed"),
            }
        }
        ShellCommand::Orders => {
            if state.session().lock().await.identity().customer().is_none() {
                println!("Please log in to view your orders");
                return Ok(Flow::Continue);
            }
            let orders = state.api().my_orders().await?;
            if orders.is_empty() {
                println!("No orders yet");
            }
            for order in &orders {
                println!("{}", order_line(order));
            }
        }
        ShellCommand::Dashboard => {
            let mut session = state.session().lock().await;
            let dashboard = admin::dashboard(&mut session, state.api()).await?;
            for line in dashboard_lines(&dashboard) {
                println!("{line}");
            }
        }
        ShellCommand::AdminOrders { status, search } => {
            let filter = OrderFilter { status, search };
            let mut session = state.session().lock().await;
            let orders = admin::orders(&mut session, state.api(), &filter).await?;
            if orders.is_empty() {
                println!("No orders match");
            }
            for order in &orders {
                let actions: Vec<&str> = order
                    .status
                    .admin_actions()
                    .iter()
                    .map(OrderStatus::as_str)
                    .collect();
                if actions.is_empty() {
                    println!("{}", order_line(order));
                } else {
                    println!("{}  [{}]", order_line(order), actions.join(" | "));
                }
            }
        }
        ShellCommand::SetStatus { id, status } => {
            let mut session = state.session().lock().await;
            admin::update_status(&mut session, state.api(), &id, status).await?;
            println!("Order {id} is now {status}");
        }
        ShellCommand::AddDish => {
            let dish = read_dish(input).await?;
            let name = dish.name.clone();
            let mut session = state.session().lock().await;
            admin::add_dish(&mut session, state.api(), dish).await?;
            println!("Added {name}");
        }
    }
    Ok(Flow::Continue)
}

async fn read_dish<R: AsyncBufRead + Unpin>(input: &mut Input<R>) -> Result<NewDish, AppError> {
    let name = input.require("Name: ").await?;
    let dish_type: DishType = input
        .require("Type (Veg/Non-Veg): ")
        .await?
        .parse()
        .map_err(AppError::BadRequest)?;
    let category = input.require("Category: ").await?;
    let price: Price = input
        .require("Price: ")
        .await?
        .parse()
        .map_err(|e: cloud_kitchen_core::PriceError| AppError::BadRequest(e.to_string()))?;
    let description = input.ask("Description: ").await?.unwrap_or_default();
    let image = match input.ask("Image path (optional): ").await? {
        Some(path) if !path.is_empty() => Some(DishImage::from_path(Path::new(&path)).await?),
        _ => None,
    };

    Ok(NewDish {
        name,
        dish_type,
        category,
        price,
        description,
        image,
    })
}
