use std::error::Error;
use std::path::Path;

use planner_core::model::{MaterialRef, Subject, TaskId, parse_exam_date};
use planner_core::progress::days_until;
use services::{AppServices, Dashboard, Durability, PlannerAction, PlannerWorkflow, SignupRequest};

use crate::cli::{Command, SignupArgs, SubjectsCommand};

type CommandResult = Result<(), Box<dyn Error>>;

pub async fn run(command: Command, services: &mut AppServices) -> CommandResult {
    match command {
        Command::Login { email, password } => {
            let saved = services.login(&email, &password).await?;
            println!("Signed in as {}.", saved.value.display_name());
            report(&saved.durability);
        }
        Command::Signup(args) => signup(services, args).await?,
        Command::Logout => {
            let durability = services.logout().await;
            println!("Signed out.");
            report(&durability);
        }
        Command::Whoami => match services.session().current() {
            Some(identity) => println!(
                "{} ({}) <{}>",
                identity.display_name(),
                identity.full_name(),
                identity.email()
            ),
            None => println!("{}", Dashboard::greeting(None)),
        },
        Command::Dashboard { toggles } => dashboard(services, &toggles).await?,
        Command::Subjects(command) => subjects(services, command).await?,
    }
    Ok(())
}

async fn signup(services: &mut AppServices, args: SignupArgs) -> CommandResult {
    let saved = services
        .signup(SignupRequest {
            full_name: args.full_name,
            display_name: args.display_name,
            email: args.email,
            password: args.password,
        })
        .await?;
    println!("Account created. Signed in as {}.", saved.value.display_name());
    report(&saved.durability);
    Ok(())
}

async fn dashboard(services: &AppServices, toggles: &[TaskId]) -> CommandResult {
    let identity = services.session().require()?;
    let mut dashboard = services.dashboard().await?;
    for id in toggles {
        if !dashboard.toggle_task(*id) {
            eprintln!("No task with id {id}.");
        }
    }

    println!("{}", Dashboard::greeting(Some(identity)));
    println!();
    println!("Weekly schedule:");
    for day in dashboard.schedule() {
        println!("  {:<10} {}", day.day(), day.tasks());
    }
    println!();
    println!("Today's tasks:");
    for task in dashboard.tasks() {
        let mark = if task.is_completed() { 'x' } else { ' ' };
        println!("  [{mark}] {:>2}. {}", task.id().value(), task.task());
    }

    let progress = services.progress(&dashboard);
    println!();
    println!("Overall progress: {}%", progress.overall);
    println!("  tasks: {:.0}%", progress.task_progress);
    match progress.days_until_exam {
        Some(days) => println!(
            "  exams: {:.0}% ({days} days to the nearest exam)",
            progress.exam_progress
        ),
        None => println!(
            "  exams: {:.0}% (no exams scheduled)",
            progress.exam_progress
        ),
    }
    Ok(())
}

async fn subjects(services: &mut AppServices, command: SubjectsCommand) -> CommandResult {
    let mut workflow = PlannerWorkflow::new();
    match command {
        SubjectsCommand::List => return list_subjects(services),
        SubjectsCommand::Add {
            name,
            exam_date,
            difficulty,
            materials,
        } => {
            workflow.select(PlannerAction::Add);
            workflow.set_name(name);
            workflow.set_exam_date(exam_date.as_deref().map(parse_exam_date).transpose()?);
            workflow.set_difficulty(difficulty);
            workflow.select_materials(load_materials(&materials)?);
        }
        SubjectsCommand::Update {
            name,
            exam_date,
            materials,
        } => {
            workflow.select(PlannerAction::Update);
            workflow.set_name(name);
            workflow.set_exam_date(exam_date.as_deref().map(parse_exam_date).transpose()?);
            workflow.select_materials(load_materials(&materials)?);
        }
        SubjectsCommand::Remove { name } => {
            workflow.select(PlannerAction::Remove);
            workflow.set_name(name);
        }
    }

    let outcome = workflow.submit(services.subjects_mut()?).await?;
    println!("{}", outcome.message.text);
    Ok(())
}

fn list_subjects(services: &AppServices) -> CommandResult {
    let now = services.clock().now();
    let registry = services.subjects()?;
    if registry.subjects().is_empty() {
        println!("No subjects yet. Add one with `plania subjects add`.");
    }
    for subject in registry.subjects() {
        print_subject(subject, days_until(subject.exam_date(), now));
    }
    Ok(())
}

fn print_subject(subject: &Subject, days: i64) {
    println!(
        "{}  exam {} (in {days} days)  difficulty {}",
        subject.name(),
        subject.exam_date(),
        subject.difficulty()
    );
    for material in subject.materials() {
        match material.size_bytes() {
            Some(size) => println!("    - {} ({size} bytes)", material.name()),
            None => println!("    - {}", material.name()),
        }
    }
}

fn load_materials(paths: &[impl AsRef<Path>]) -> Result<Vec<MaterialRef>, Box<dyn Error>> {
    paths.iter().map(|path| material_from_path(path.as_ref())).collect()
}

/// Describe a local file as a material reference. The file is not copied.
fn material_from_path(path: &Path) -> Result<MaterialRef, Box<dyn Error>> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| format!("not a file: {}", path.display()))?;
    let metadata = std::fs::metadata(path)?;
    let mut material = MaterialRef::new(name)?.with_size(metadata.len());
    if let Some(media_type) = media_type(path) {
        material = material.with_media_type(media_type);
    }
    Ok(material)
}

fn media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "ppt" => Some("application/vnd.ms-powerpoint"),
        "pptx" => Some("application/vnd.openxmlformats-officedocument.presentationml.presentation"),
        _ => None,
    }
}

fn report(durability: &Durability) {
    if let Some(warning) = durability.warning() {
        eprintln!("{warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_types_for_slides_and_pdfs() {
        assert_eq!(media_type(Path::new("notes.PDF")), Some("application/pdf"));
        assert_eq!(
            media_type(Path::new("deck.ppt")),
            Some("application/vnd.ms-powerpoint")
        );
        assert_eq!(media_type(Path::new("essay.txt")), None);
        assert_eq!(media_type(Path::new("README")), None);
    }

    #[test]
    fn material_records_name_and_size() {
        let path = std::env::temp_dir().join(format!("plania-material-{}.pdf", std::process::id()));
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let material = material_from_path(&path).unwrap();
        assert!(material.name().starts_with("plania-material-"));
        assert_eq!(material.size_bytes(), Some(8));
        assert_eq!(material.media_type(), Some("application/pdf"));

        std::fs::remove_file(&path).unwrap();
        assert!(material_from_path(&path).is_err());
    }
}
