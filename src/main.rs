use std::error::Error;
use std::fs;
use std::path::Path;

use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Password, Select};
use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use log::info;

use tutordesk::availability::parse_availability;
use tutordesk::chat_client::OpenAiClient;
use tutordesk::lessons::generate_lesson_plan;
use tutordesk::models::student_model::{Student, WEEKDAYS};
use tutordesk::models::{Args, Config};
use tutordesk::pdf::{create_pdf, read_pdf};
use tutordesk::quizzes::{generate_quiz, split_questions_answers};
use tutordesk::session::{validate_registration, SessionStore, MAX_SUBJECTS, SUBJECTS};
use tutordesk::timetable::{
    audit_sessions, generate_timetable, sessions_for_day, sessions_per_day, sessions_per_student,
    sessions_to_csv,
};

const PAGES: [&str; 6] = [
    "Home",
    "Student Management System",
    "Lesson Plan Generator",
    "Quiz Generator",
    "History",
    "Quit",
];

#[tokio::main]
async fn main() {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("TUTOR_"))
        .extract()
        .unwrap();
    info!(
        "Read config from {}",
        std::path::absolute(&args.config_json_path)
            .unwrap()
            .display()
    );

    let api_key = resolve_api_key(&config).unwrap();
    let client = OpenAiClient::new(
        reqwest::Client::new(),
        config.api_base.clone(),
        api_key,
        config.model.clone(),
    );
    fs::create_dir_all(&args.export_dir).unwrap();

    let mut session = SessionStore::default();

    loop {
        println!();
        let page = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Select a Page")
            .items(&PAGES)
            .default(0)
            .interact()
            .unwrap();

        let outcome = match PAGES[page] {
            "Home" => {
                home_page();
                Ok(())
            }
            "Student Management System" => {
                student_management_page(&client, &mut session, &args.export_dir).await
            }
            "Lesson Plan Generator" => {
                lesson_plan_page(&client, &mut session, &args.export_dir).await
            }
            "Quiz Generator" => quiz_page(&client, &mut session, &args.export_dir).await,
            "History" => history_page(&session, &args.export_dir),
            _ => break,
        };

        /* Every failure is local to the interaction that triggered it */
        if let Err(error) = outcome {
            eprintln!("An error occurred: {error}");
        }
    }
}

/// The API credential comes from the config/environment; when absent the
/// interaction halts on a hidden prompt until one is supplied.
fn resolve_api_key(config: &Config) -> Result<String, Box<dyn Error>> {
    if let Some(key) = config.api_key.as_deref() {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }
    loop {
        let key = Password::new()
            .with_prompt("Enter your OpenAI API key")
            .allow_empty_password(true)
            .interact()?;
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
        println!("Please enter a valid API key to proceed.");
    }
}

fn home_page() {
    println!("=== TutorDesk ===");
    println!("Welcome to TutorDesk!");
    println!(
        "This application helps educators create personalized lesson plans and quizzes \
         effortlessly, based on age, subject, and topic. The Student Management System \
         keeps track of your students and builds weekly timetables for them."
    );
}

async fn student_management_page(
    client: &OpenAiClient,
    session: &mut SessionStore,
    export_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let tabs = [
        "Student Registration",
        "Timetable Generator",
        "Back",
    ];
    loop {
        let tab = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Student Management System")
            .items(&tabs)
            .default(0)
            .interact()?;
        match tabs[tab] {
            "Student Registration" => registration_tab(client, session).await?,
            "Timetable Generator" => timetable_tab(client, session, export_dir).await?,
            _ => return Ok(()),
        }
    }
}

async fn registration_tab(
    client: &OpenAiClient,
    session: &mut SessionStore,
) -> Result<(), Box<dyn Error>> {
    let actions = [
        "Register a new student",
        "View registered students",
        "Delete a student",
        "Back",
    ];
    loop {
        let action = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Student Registration")
            .items(&actions)
            .default(0)
            .interact()?;
        match actions[action] {
            "Register a new student" => register_student(client, session).await?,
            "View registered students" => view_students(session),
            "Delete a student" => delete_student(session)?,
            _ => return Ok(()),
        }
    }
}

async fn register_student(
    client: &OpenAiClient,
    session: &mut SessionStore,
) -> Result<(), Box<dyn Error>> {
    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Student Name")
        .allow_empty(true)
        .interact_text()?;
    let age: u32 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Age")
        .default(15)
        .validate_with(|age: &u32| -> Result<(), &str> {
            if (5..=100).contains(age) {
                Ok(())
            } else {
                Err("Age must be between 5 and 100")
            }
        })
        .interact_text()?;
    let subjects = select_subjects()?;
    let availability_text: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Student Availability (e.g. 'Monday 2pm-10pm, Wednesday mornings 9-11')")
        .allow_empty(true)
        .interact_text()?;

    if let Err(message) = validate_registration(&name, &subjects, &availability_text) {
        eprintln!("{message}");
        return Ok(());
    }

    /* Only a fully parsed availability map produces a registration */
    match parse_availability(client, &availability_text).await {
        Ok(availability) => {
            println!("Successfully registered {name}!");
            session.register_student(Student {
                name,
                age,
                subjects,
                availability,
            });
        }
        Err(error) => eprintln!("Error parsing availability: {error}"),
    }
    Ok(())
}

/// The form re-prompts until at most three subjects are picked; a fourth
/// selection is never accepted.
fn select_subjects() -> Result<Vec<String>, Box<dyn Error>> {
    loop {
        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Select Subjects (maximum {MAX_SUBJECTS}, SPACE to toggle, ENTER to confirm)"
            ))
            .items(&SUBJECTS)
            .interact()?;
        if picked.len() > MAX_SUBJECTS {
            println!("Please select at most {MAX_SUBJECTS} subjects.");
            continue;
        }
        return Ok(picked
            .into_iter()
            .map(|index| SUBJECTS[index].to_string())
            .collect());
    }
}

fn view_students(session: &SessionStore) {
    if session.students.is_empty() {
        println!("No students registered yet.");
        return;
    }
    println!("Registered Students");
    for student in &session.students {
        println!(
            "- {} (Age: {}) — {}",
            student.name,
            student.age,
            student.subjects.join(", ")
        );
        println!("  {:<12} {:<15} {}", "Day", "Status", "Time");
        for (day, window) in student.availability.days() {
            let (status, time_range) = if window.available {
                (
                    "Available",
                    format!(
                        "{} - {}",
                        window.start.format("%I:%M %p"),
                        window.end.format("%I:%M %p")
                    ),
                )
            } else {
                ("Not Available", "-".to_string())
            };
            println!("  {day:<12} {status:<15} {time_range}");
        }
    }
}

fn delete_student(session: &mut SessionStore) -> Result<(), Box<dyn Error>> {
    if session.students.is_empty() {
        println!("No students registered yet.");
        return Ok(());
    }
    let mut items: Vec<String> = session
        .students
        .iter()
        .map(|student| format!("{} (Age: {})", student.name, student.age))
        .collect();
    items.push("Cancel".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Delete which student?")
        .items(&items)
        .default(items.len() - 1)
        .interact()?;
    if choice < session.students.len() && session.delete_student(choice).is_some() {
        println!("Student deleted successfully!");
    }
    Ok(())
}

async fn timetable_tab(
    client: &OpenAiClient,
    session: &SessionStore,
    export_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    if session.students.is_empty() {
        println!("No students registered. Please register students first.");
        return Ok(());
    }

    println!("Registered Students Summary");
    for student in &session.students {
        println!("- {}: {}", student.name, student.subjects.join(", "));
    }

    let teacher_availability: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Teacher Availability (e.g. 'Monday to Friday 9am-5pm, Saturday 10am-2pm')")
        .allow_empty(true)
        .interact_text()?;
    if teacher_availability.trim().is_empty() {
        eprintln!("Please enter your availability.");
        return Ok(());
    }

    println!("Generating optimal timetable...");
    let timetable = generate_timetable(client, &session.students, &teacher_availability).await?;
    println!("Timetable generated successfully!");

    println!("=== Weekly Schedule ===");
    for day in WEEKDAYS {
        let day_sessions = sessions_for_day(&timetable, day);
        if day_sessions.is_empty() {
            continue;
        }
        println!("{day}");
        println!("  {:<8} {:<20} {}", "Time", "Student", "Subject");
        for scheduled in day_sessions {
            println!(
                "  {:<8} {:<20} {}",
                scheduled.start_time, scheduled.student_name, scheduled.subject
            );
        }
    }

    for finding in audit_sessions(&timetable) {
        println!("Note: {finding}");
    }

    let csv_path = export_dir.join("weekly_timetable.csv");
    fs::write(&csv_path, sessions_to_csv(&timetable)?)?;
    println!("Saved complete timetable to {}", csv_path.display());

    println!("=== Schedule Statistics ===");
    println!("Sessions per Student");
    for (student, count) in sessions_per_student(&timetable) {
        println!("  {student:<20} {count}");
    }
    println!("Sessions per Day");
    for (day, count) in sessions_per_day(&timetable) {
        println!("  {day:<12} {count}");
    }
    Ok(())
}

async fn lesson_plan_page(
    client: &OpenAiClient,
    session: &mut SessionStore,
    export_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let age: u32 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter the age")
        .default(10)
        .validate_with(|age: &u32| -> Result<(), &str> {
            if (1..=100).contains(age) {
                Ok(())
            } else {
                Err("Age must be between 1 and 100")
            }
        })
        .interact_text()?;
    let subject: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter the subject your student wants to learn")
        .allow_empty(true)
        .interact_text()?;
    let topic: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter the specific topic within the subject")
        .allow_empty(true)
        .interact_text()?;

    if subject.trim().is_empty() || topic.trim().is_empty() {
        eprintln!("Please enter both a subject and a topic before generating the lesson plan.");
        return Ok(());
    }

    println!("Generating your personalized lesson plan...");
    let lesson_plan = generate_lesson_plan(client, age, &subject, &topic).await?;

    println!("Your Personalized Lesson Plan:");
    println!("{lesson_plan}");

    let pdf_path = export_dir.join(format!(
        "lesson_plan_{}.pdf",
        session.next_lesson_plan_number()
    ));
    fs::write(&pdf_path, create_pdf("Lesson Plan", &lesson_plan)?)?;
    println!("Saved lesson plan to {}", pdf_path.display());

    session.record_lesson_plan(lesson_plan, subject, topic, age);
    Ok(())
}

async fn quiz_page(
    client: &OpenAiClient,
    session: &mut SessionStore,
    export_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let pdf_path: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Path to the PDF file")
        .allow_empty(true)
        .interact_text()?;
    if pdf_path.trim().is_empty() {
        eprintln!("Please provide a PDF file to generate a quiz.");
        return Ok(());
    }
    let num_questions: u32 = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Number of questions (5-10)")
        .default(5)
        .validate_with(|count: &u32| -> Result<(), &str> {
            if (5..=10).contains(count) {
                Ok(())
            } else {
                Err("Choose between 5 and 10 questions")
            }
        })
        .interact_text()?;

    println!("Reading PDF and generating quiz...");
    let bytes = fs::read(&pdf_path)?;
    let pdf_content = read_pdf(&bytes)?;
    let quiz = generate_quiz(client, &pdf_content, num_questions).await?;
    let (questions_only, answers_only) = split_questions_answers(&quiz);

    println!("Generated Quiz Questions:");
    println!("{questions_only}");
    println!("Generated Quiz Answers:");
    println!("{answers_only}");

    let questions_path = export_dir.join("quiz_questions.pdf");
    fs::write(&questions_path, create_pdf("Quiz Questions", &questions_only)?)?;
    let answers_path = export_dir.join("quiz_answers.pdf");
    fs::write(&answers_path, create_pdf("Quiz Answers", &answers_only)?)?;
    println!(
        "Saved quiz to {} and {}",
        questions_path.display(),
        answers_path.display()
    );

    let file_name = Path::new(&pdf_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| pdf_path.clone());
    session.record_quiz(questions_only, answers_only, file_name);
    Ok(())
}

fn history_page(session: &SessionStore, export_dir: &Path) -> Result<(), Box<dyn Error>> {
    println!("=== Quiz History ===");
    if session.quiz_history.is_empty() {
        println!("No quizzes generated yet. Generate a quiz in the Quiz Generator page to see it here.");
    } else {
        /* most recent first */
        for (offset, quiz) in session.quiz_history.iter().rev().enumerate() {
            let number = session.quiz_history.len() - offset;
            println!("Quiz {number}: {} - {}", quiz.file_name, quiz.timestamp);
            println!("Questions:");
            println!("{}", quiz.questions);
            println!("Answers:");
            println!("{}", quiz.answers);
        }
    }

    println!("=== Lesson Plan History ===");
    if session.lesson_plan_history.is_empty() {
        println!(
            "No lesson plans generated yet. Generate a lesson plan in the Lesson Plan \
             Generator page to see it here."
        );
    } else {
        for (offset, plan) in session.lesson_plan_history.iter().rev().enumerate() {
            let number = session.lesson_plan_history.len() - offset;
            println!(
                "Lesson Plan {number}: {} - {} (Age: {}) - {}",
                plan.subject, plan.topic, plan.age, plan.timestamp
            );
            println!("{}", plan.lesson_plan);
        }
    }

    if session.quiz_history.is_empty() && session.lesson_plan_history.is_empty() {
        return Ok(());
    }
    export_history_entry(session, export_dir)
}

/// Re-export a stored entry as PDF files, numbered the way the listing is.
fn export_history_entry(session: &SessionStore, export_dir: &Path) -> Result<(), Box<dyn Error>> {
    let mut actions = Vec::new();
    if !session.quiz_history.is_empty() {
        actions.push("Export a quiz to PDF");
    }
    if !session.lesson_plan_history.is_empty() {
        actions.push("Export a lesson plan to PDF");
    }
    actions.push("Back");

    let action = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("History")
        .items(&actions)
        .default(actions.len() - 1)
        .interact()?;

    match actions[action] {
        "Export a quiz to PDF" => {
            let number = prompt_entry_number(session.quiz_history.len())?;
            let quiz = &session.quiz_history[number - 1];
            let questions_path = export_dir.join(format!("quiz_questions_{number}.pdf"));
            fs::write(&questions_path, create_pdf("Quiz Questions", &quiz.questions)?)?;
            let answers_path = export_dir.join(format!("quiz_answers_{number}.pdf"));
            fs::write(&answers_path, create_pdf("Quiz Answers", &quiz.answers)?)?;
            println!(
                "Saved {} and {}",
                questions_path.display(),
                answers_path.display()
            );
        }
        "Export a lesson plan to PDF" => {
            let number = prompt_entry_number(session.lesson_plan_history.len())?;
            let plan = &session.lesson_plan_history[number - 1];
            let pdf_path = export_dir.join(format!("lesson_plan_{number}.pdf"));
            fs::write(&pdf_path, create_pdf("Lesson Plan", &plan.lesson_plan)?)?;
            println!("Saved {}", pdf_path.display());
        }
        _ => {}
    }
    Ok(())
}

fn prompt_entry_number(count: usize) -> Result<usize, Box<dyn Error>> {
    let number: usize = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Entry number (1-{count})"))
        .default(count)
        .validate_with(move |number: &usize| -> Result<(), String> {
            if (1..=count).contains(number) {
                Ok(())
            } else {
                Err(format!("Choose an entry between 1 and {count}"))
            }
        })
        .interact_text()?;
    Ok(number)
}
