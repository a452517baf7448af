//! Line-oriented interactive menu over the user service.
//!
//! Pure I/O plumbing: prompts, re-prompt loops and rendering. All
//! decision logic lives in the service. Field prompts reuse the rule
//! strings from `domain::validation`, so a rejected value is explained
//! with the same wording the service would use.

use std::io::{self, BufRead, Write};

use domain::validation::{self, AGE_RULE, EMAIL_RULE, NAME_RULE};
use domain::{UserPatch, UserRecord};
use user_service::{AppError, UserService};

/// Keyword aborting the current operation at any prompt.
const CANCEL: &str = "cancel";

/// Result of an optional-field prompt during edit.
enum Entry<T> {
    Cancelled,
    Keep,
    Value(T),
}

pub struct Shell<S> {
    service: S,
}

impl<S: UserService> Shell<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Run the menu loop until exit or end of input.
    pub async fn run(&self) -> io::Result<()> {
        println!("====================================");
        println!("      USER MANAGEMENT CONSOLE");
        println!("====================================");

        loop {
            print_menu();
            let Some(choice) = read_trimmed("Select an option: ")? else {
                break;
            };

            match choice.as_str() {
                "1" => self.add_user().await?,
                "2" => self.view_user().await?,
                "3" => self.list_users().await?,
                "4" => self.edit_user().await?,
                "5" => self.delete_user().await?,
                "6" => self.find_by_email().await?,
                "0" => break,
                _ => {
                    println!("Unknown option, please try again.");
                    continue;
                }
            }

            if pause()? {
                break;
            }
        }

        println!("\nGoodbye!");
        Ok(())
    }

    async fn add_user(&self) -> io::Result<()> {
        println!("\n--- Add new user ---");

        let Some(name) = prompt_field("Full name", validation::is_valid_name, NAME_RULE)? else {
            return cancelled();
        };
        let Some(email) = prompt_field("Email", validation::is_valid_email, EMAIL_RULE)? else {
            return cancelled();
        };
        let Some(age) = prompt_age("Age (1-120)")? else {
            return cancelled();
        };

        match self.service.register(name, email, age).await {
            Ok(user) => {
                println!("User registered successfully!");
                println!("User id: {}", user.id);
            }
            Err(err) => report(&err),
        }
        Ok(())
    }

    async fn view_user(&self) -> io::Result<()> {
        println!("\n--- View user details ---");

        let Some(id) = prompt_id("User id")? else {
            return cancelled();
        };

        match self.service.get_by_id(id).await {
            Ok(Some(user)) => {
                println!("\nUser details:");
                print_record(&user);
            }
            Ok(None) => println!("No user found with id {id}"),
            Err(err) => report(&err),
        }
        Ok(())
    }

    async fn list_users(&self) -> io::Result<()> {
        println!("\n--- All registered users ---");

        match self.service.list_all().await {
            Ok(users) if users.is_empty() => println!("No users found."),
            Ok(users) => {
                println!(
                    "{:<5} {:<20} {:<25} {:<7} {:<12}",
                    "ID", "Name", "Email", "Age", "Registered"
                );
                println!("{}", "-".repeat(72));
                for user in &users {
                    println!(
                        "{:<5} {:<20} {:<25} {:<7} {:<12}",
                        user.id,
                        truncate(&user.name, 18),
                        truncate(&user.email, 23),
                        user.age,
                        user.created_at.format("%Y-%m-%d")
                    );
                }
                println!("Total users: {}", users.len());
            }
            Err(err) => report(&err),
        }
        Ok(())
    }

    async fn edit_user(&self) -> io::Result<()> {
        println!("\n--- Edit user ---");

        let Some(id) = prompt_id("User id to edit")? else {
            return cancelled();
        };

        let current = match self.service.get_by_id(id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                println!("No user found with id {id}");
                return Ok(());
            }
            Err(err) => {
                report(&err);
                return Ok(());
            }
        };

        let mut patch = UserPatch::default();

        match prompt_edit_field(
            &format!("New name (Enter keeps '{}')", current.name),
            validation::is_valid_name,
            NAME_RULE,
        )? {
            Entry::Cancelled => return cancelled(),
            Entry::Keep => println!("Name unchanged."),
            Entry::Value(name) => patch.name = Some(name),
        }

        match prompt_edit_field(
            &format!("New email (Enter keeps '{}')", current.email),
            validation::is_valid_email,
            EMAIL_RULE,
        )? {
            Entry::Cancelled => return cancelled(),
            Entry::Keep => println!("Email unchanged."),
            Entry::Value(email) => patch.email = Some(email),
        }

        match prompt_edit_age(&format!("New age (Enter keeps {})", current.age))? {
            Entry::Cancelled => return cancelled(),
            Entry::Keep => println!("Age unchanged."),
            Entry::Value(age) => patch.age = Some(age),
        }

        if patch.is_empty() {
            println!("Nothing to change.");
            return Ok(());
        }

        match self.service.modify(id, patch).await {
            Ok(_) => println!("User updated successfully!"),
            Err(err) => report(&err),
        }
        Ok(())
    }

    async fn delete_user(&self) -> io::Result<()> {
        println!("\n--- Delete user ---");

        let Some(id) = prompt_id("User id to delete")? else {
            return cancelled();
        };

        let Some(confirmation) = read_trimmed("Are you sure? (yes/no): ")? else {
            return cancelled();
        };
        if !confirmation.eq_ignore_ascii_case("yes") {
            println!("Deletion cancelled.");
            return Ok(());
        }

        match self.service.delete(id).await {
            Ok(true) => println!("User deleted successfully!"),
            Ok(false) => println!("No user found with id {id}"),
            Err(err) => report(&err),
        }
        Ok(())
    }

    async fn find_by_email(&self) -> io::Result<()> {
        println!("\n--- Find user by email ---");

        let email = loop {
            let Some(value) = read_trimmed("Email address (or 'cancel'): ")? else {
                return cancelled();
            };
            if !value.is_empty() {
                break value;
            }
            println!("Error: email must not be blank");
        };

        match self.service.find_by_email(&email).await {
            Ok(Some(user)) => {
                println!("\nUser found:");
                print_record(&user);
            }
            Ok(None) => println!("No user found with email {email}"),
            Err(err) => report(&err),
        }
        Ok(())
    }
}

fn print_menu() {
    println!("\n--- Main menu ---");
    println!("1. Add new user");
    println!("2. View user details");
    println!("3. List all users");
    println!("4. Edit user");
    println!("5. Delete user");
    println!("6. Find user by email");
    println!("0. Exit");
}

fn print_record(user: &UserRecord) {
    println!("ID: {}", user.id);
    println!("Name: {}", user.name);
    println!("Email: {}", user.email);
    println!("Age: {}", user.age);
    println!("Registered: {}", user.created_at.format("%Y-%m-%d %H:%M:%S"));
}

/// Render a service error. Validation, conflict and concurrency
/// errors are recoverable and shown verbatim; storage failures are
/// reported without leaking engine details.
fn report(err: &AppError) {
    match err {
        AppError::Database(_) => {
            tracing::error!(error = ?err, "storage failure");
            println!("Storage failure, the operation was aborted.");
        }
        _ => println!("Error: {err}"),
    }
}

fn cancelled() -> io::Result<()> {
    println!("Operation cancelled.");
    Ok(())
}

/// Print a prompt and read one trimmed line. `None` means end of
/// input or the cancel keyword.
fn read_trimmed(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let value = line.trim().to_string();
    if value.eq_ignore_ascii_case(CANCEL) {
        return Ok(None);
    }
    Ok(Some(value))
}

/// Wait for Enter between operations. Returns true on end of input.
fn pause() -> io::Result<bool> {
    print!("\nPress Enter to continue...");
    io::stdout().flush()?;

    let mut line = String::new();
    Ok(io::stdin().lock().read_line(&mut line)? == 0)
}

/// Re-prompt until the value passes `valid` or the user cancels.
fn prompt_field(
    label: &str,
    valid: impl Fn(&str) -> bool,
    rule: &str,
) -> io::Result<Option<String>> {
    loop {
        let Some(value) = read_trimmed(&format!("{label} (or 'cancel'): "))? else {
            return Ok(None);
        };
        if valid(&value) {
            return Ok(Some(value));
        }
        println!("Error: {rule}");
    }
}

fn prompt_age(label: &str) -> io::Result<Option<i32>> {
    loop {
        let Some(value) = read_trimmed(&format!("{label} (or 'cancel'): "))? else {
            return Ok(None);
        };
        match value.parse::<i32>() {
            Ok(age) if validation::is_valid_age(age) => return Ok(Some(age)),
            Ok(_) => println!("Error: {AGE_RULE}"),
            Err(_) => println!("Error: enter a number"),
        }
    }
}

fn prompt_id(label: &str) -> io::Result<Option<i64>> {
    loop {
        let Some(value) = read_trimmed(&format!("{label} (or 'cancel'): "))? else {
            return Ok(None);
        };
        match value.parse::<i64>() {
            Ok(id) if id > 0 => return Ok(Some(id)),
            Ok(_) => println!("Error: id must be a positive number"),
            Err(_) => println!("Error: id must be a number"),
        }
    }
}

/// Like `prompt_field`, but an empty line keeps the current value.
fn prompt_edit_field(
    label: &str,
    valid: impl Fn(&str) -> bool,
    rule: &str,
) -> io::Result<Entry<String>> {
    loop {
        let Some(value) = read_trimmed(&format!("{label} (or 'cancel'): "))? else {
            return Ok(Entry::Cancelled);
        };
        if value.is_empty() {
            return Ok(Entry::Keep);
        }
        if valid(&value) {
            return Ok(Entry::Value(value));
        }
        println!("Error: {rule}");
    }
}

fn prompt_edit_age(label: &str) -> io::Result<Entry<i32>> {
    loop {
        let Some(value) = read_trimmed(&format!("{label} (or 'cancel'): "))? else {
            return Ok(Entry::Cancelled);
        };
        if value.is_empty() {
            return Ok(Entry::Keep);
        }
        match value.parse::<i32>() {
            Ok(age) if validation::is_valid_age(age) => return Ok(Entry::Value(age)),
            Ok(_) => println!("Error: {AGE_RULE}"),
            Err(_) => println!("Error: enter a number"),
        }
    }
}

/// Shorten a value for the list table.
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
