use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use client::config::{DEFAULT_CHAT_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use client::state::form_view::LOAD_FAILED_MESSAGE;
use client::state::{
    DashboardController, EditorController, FormViewController, Registration, ResponsesController, SmsController,
    StudentsController,
};
use client::store::{FileStore, KvStore, LastUsed, MemoryStore, StoreError};
use client::{ApiClient, ApiError, ChatClient, ChatError, ClientConfig, ControllerError, Timeouts};
use forms::render::EMPTY_SURVEY_MESSAGE;
use forms::{
    AnswerMap, ClassInfo, DraftError, FieldPatch, FieldType, FormDraft, FormFieldSchema, FormSchema, FormType,
    InputError, OTHER_OPTION, RecipientType, RenderPlan, StudentUpdate, SurveyForm,
};
use serde_json::Value;
use time::UtcOffset;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{}", .0.message())]
    Controller(#[from] ControllerError),
    #[error("{}", .0.message())]
    Api(#[from] ApiError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("invalid UTC offset: {0} hours")]
    InvalidUtcOffset(i8),
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{0} does not hold a form schema")]
    InvalidSchema(PathBuf),
    #[error("{0}")]
    Missing(String),
}

impl From<DraftError> for CliError {
    fn from(e: DraftError) -> Self {
        Self::Controller(e.into())
    }
}

#[derive(Parser, Debug)]
#[command(name = "homeroom", about = "Homeroom forms, roster and SMS command line")]
struct Cli {
    #[arg(long, env = "HOMEROOM_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "HOMEROOM_CHAT_URL", default_value = DEFAULT_CHAT_URL)]
    chat_url: String,

    #[arg(long, env = "HOMEROOM_SHARE_BASE_URL", default_value = "")]
    share_base_url: String,

    #[arg(long, env = "HOMEROOM_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[arg(long, default_value_t = 9, allow_hyphen_values = true)]
    utc_offset_hours: i8,

    /// JSON file remembering the last folder and SMS recipient between runs.
    #[arg(long, env = "HOMEROOM_STATE_FILE")]
    state_file: Option<PathBuf>,

    /// Log controller activity to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.as_deref().map(str::trim).filter(|url| !url.is_empty()).map(str::to_owned),
            chat_url: self.chat_url.clone(),
            share_base_url: self.share_base_url.trim_end_matches('/').to_owned(),
            timeouts: Timeouts { request_secs: self.timeout_secs, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS },
        }
    }

    fn utc_offset(&self) -> Result<UtcOffset, CliError> {
        UtcOffset::from_hms(self.utc_offset_hours, 0, 0).map_err(|_| CliError::InvalidUtcOffset(self.utc_offset_hours))
    }

    /// Nothing is remembered without a state file.
    fn last_used(&self) -> LastUsed {
        let backend: Arc<dyn KvStore> = match &self.state_file {
            Some(path) => Arc::new(FileStore::new(path)),
            None => Arc::new(MemoryStore::new()),
        };
        LastUsed::new(backend)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Forms(FormsCommand),
    Folders(FoldersCommand),
    Responses(ResponsesCommand),
    Students(StudentsCommand),
    Class(ClassCommand),
    Sms(SmsCommand),
    /// Ask the chat-assist proxy to draft notice or survey text.
    Chat { message: String },
}

#[derive(Args, Debug)]
struct FormsCommand {
    #[command(subcommand)]
    command: FormsSubcommand,
}

#[derive(Subcommand, Debug)]
enum FormsSubcommand {
    List {
        #[arg(long)]
        folder: Option<String>,
    },
    Get {
        form_id: String,
    },
    Create {
        #[arg(long = "type", value_parser = parse_form_type, default_value = "notice")]
        form_type: FormType,
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: Option<String>,
        /// Folder id; defaults to the last one used.
        #[arg(long)]
        folder: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change title, body or fields of an existing form.
    Edit {
        form_id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Authenticate as a student and submit answers (or confirm a notice).
    Respond {
        form_id: String,
        #[arg(long)]
        student_id: String,
        #[arg(long)]
        auth_code: String,
        #[command(flatten)]
        answers: AnswerArgs,
    },
    Delete {
        form_id: String,
    },
    ShareLink {
        form_id: String,
    },
    NonResponders {
        form_id: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct FieldArgs {
    /// JSON form schema file; replaces every existing field.
    #[arg(long)]
    schema: Option<PathBuf>,
    /// `TYPE:LABEL[*][:opt1|opt2|...]`, appended in order. A trailing `*` on
    /// the label marks the field required.
    #[arg(long = "field", value_parser = parse_field_spec)]
    fields: Vec<FieldSpec>,
}

#[derive(Args, Debug, Clone, Default)]
struct AnswerArgs {
    /// `FIELD_ID=VALUE`. Repeat per checkbox option; `FIELD_ID_other=TEXT`
    /// fills the 기타 text.
    #[arg(long = "answer", value_parser = parse_answer_spec)]
    answers: Vec<AnswerSpec>,
}

/// One field authored on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldSpec {
    field_type: FieldType,
    label: String,
    required: bool,
    options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AnswerSpec {
    key: String,
    value: String,
}

#[derive(Args, Debug)]
struct FoldersCommand {
    #[command(subcommand)]
    command: FoldersSubcommand,
}

#[derive(Subcommand, Debug)]
enum FoldersSubcommand {
    List,
    Create { name: String },
}

#[derive(Args, Debug)]
struct ResponsesCommand {
    #[command(subcommand)]
    command: ResponsesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ResponsesSubcommand {
    List {
        form_id: String,
    },
    /// Export the response grid as CSV (default) or printable HTML.
    Grid {
        form_id: String,
        #[arg(long)]
        html: bool,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Replace the named answers of one response; other answers are kept.
    Update {
        form_id: String,
        response_id: String,
        #[command(flatten)]
        answers: AnswerArgs,
    },
    Delete {
        form_id: String,
        response_id: String,
    },
}

#[derive(Args, Debug)]
struct StudentsCommand {
    #[command(subcommand)]
    command: StudentsSubcommand,
}

#[derive(Subcommand, Debug)]
enum StudentsSubcommand {
    List,
    Add(StudentArgs),
    Update {
        /// Current student id of the row to change.
        find_by_student_id: String,
        #[arg(long)]
        student_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone_student: Option<String>,
        #[arg(long)]
        phone_parent: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        student_id: String,
    },
    /// Printable HTML roster with auth codes.
    Roster {
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
struct StudentArgs {
    #[arg(long)]
    student_id: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    phone_student: String,
    #[arg(long, default_value = "")]
    phone_parent: String,
    #[arg(long, default_value = "")]
    email: String,
}

impl From<StudentArgs> for Registration {
    fn from(args: StudentArgs) -> Self {
        Self {
            student_id: args.student_id,
            name: args.name,
            phone_student: args.phone_student,
            phone_parent: args.phone_parent,
            email: args.email,
        }
    }
}

#[derive(Args, Debug)]
struct ClassCommand {
    #[command(subcommand)]
    command: ClassSubcommand,
}

#[derive(Subcommand, Debug)]
enum ClassSubcommand {
    Get,
    Set {
        #[arg(long)]
        grade: String,
        #[arg(long = "class")]
        class_num: String,
        #[arg(long)]
        teacher: String,
    },
}

#[derive(Args, Debug)]
struct SmsCommand {
    #[command(subcommand)]
    command: SmsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SmsSubcommand {
    /// List who would receive a message without sending it.
    Receivers {
        /// `student` or `parent`; defaults to the last one used, else parent.
        #[arg(long, value_parser = parse_recipient_type)]
        to: Option<RecipientType>,
    },
    Send {
        #[arg(long, value_parser = parse_recipient_type)]
        to: Option<RecipientType>,
        /// `{name}` is replaced with each student's name.
        #[arg(long)]
        message: String,
    },
}

fn parse_form_type(raw: &str) -> Result<FormType, String> {
    FormType::from_name(raw).ok_or_else(|| format!("unknown form type `{raw}` (expected survey or notice)"))
}

fn parse_recipient_type(raw: &str) -> Result<RecipientType, String> {
    RecipientType::from_name(raw).ok_or_else(|| format!("unknown recipient `{raw}` (expected student or parent)"))
}

fn parse_field_spec(raw: &str) -> Result<FieldSpec, String> {
    let mut parts = raw.splitn(3, ':');
    let type_name = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    let field_type = FieldType::from(type_name);
    if !FieldType::BUILTIN.contains(&field_type) {
        return Err(format!("unknown field type `{field_type}` in `{raw}`"));
    }
    let label = parts.next().map(str::trim).ok_or_else(|| format!("missing label in `{raw}` (expected TYPE:LABEL)"))?;
    let (label, required) = match label.strip_suffix('*') {
        Some(label) => (label.trim_end(), true),
        None => (label, false),
    };
    let options: Vec<String> = parts
        .next()
        .map(|raw| raw.split('|').map(str::trim).filter(|o| !o.is_empty()).map(str::to_owned).collect())
        .unwrap_or_default();
    if !options.is_empty() && !field_type.has_options() {
        return Err(format!("{field_type} fields take no options"));
    }
    Ok(FieldSpec { field_type, label: label.to_owned(), required, options })
}

fn parse_answer_spec(raw: &str) -> Result<AnswerSpec, String> {
    let (key, value) = raw.split_once('=').ok_or_else(|| format!("expected FIELD_ID=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field id in `{raw}`"));
    }
    Ok(AnswerSpec { key: key.to_owned(), value: value.to_owned() })
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    let config = cli.client_config();
    match &cli.command {
        Command::Chat { message } => run_chat(&config, message).await,
        Command::Forms(cmd) => run_forms(&config, &cli.last_used(), cmd).await,
        Command::Folders(cmd) => run_folders(&config, cmd).await,
        Command::Responses(cmd) => run_responses(&config, cli.utc_offset()?, cmd).await,
        Command::Students(cmd) => run_students(&config, cmd).await,
        Command::Class(cmd) => run_class(&config, cmd).await,
        Command::Sms(cmd) => run_sms(&config, &cli.last_used(), cmd).await,
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn run_chat(config: &ClientConfig, message: &str) -> Result<(), CliError> {
    let chat = ChatClient::from_config(config)?;
    let reply = chat.ask(message).await?;
    println!("{reply}");
    Ok(())
}

async fn run_forms(config: &ClientConfig, last_used: &LastUsed, cmd: &FormsCommand) -> Result<(), CliError> {
    let api = ApiClient::from_config(config)?;
    match &cmd.command {
        FormsSubcommand::List { folder } => {
            let dashboard = DashboardController::new(api, config);
            dashboard.load().await?;
            dashboard.select_folder(folder.as_deref());
            print_json(&serde_json::to_value(dashboard.visible_forms())?)
        }
        FormsSubcommand::Get { form_id } => {
            let form = api.get_form(form_id).await?;
            print_json(&serde_json::to_value(form)?)
        }
        FormsSubcommand::Create { form_type, title, body, folder, fields } => {
            let editor = EditorController::new(api);
            let mut draft = EditorController::create(*form_type);
            draft.title.clone_from(title);
            draft.folder_id = last_used.folder(folder.as_deref())?;
            apply_fields(&mut draft, body.as_deref(), fields)?;
            let form_id = editor.save(&mut draft).await?;
            print_json(&serde_json::json!({ "form_id": form_id, "share_link": config.share_link(&form_id) }))
        }
        FormsSubcommand::Edit { form_id, title, body, fields } => {
            let editor = EditorController::new(api);
            let mut draft = editor.load(form_id).await?;
            if let Some(title) = title {
                draft.title.clone_from(title);
            }
            apply_fields(&mut draft, body.as_deref(), fields)?;
            let form_id = editor.save(&mut draft).await?;
            print_json(&serde_json::json!({ "form_id": form_id, "fields": draft.fields().len() }))
        }
        FormsSubcommand::Respond { form_id, student_id, auth_code, answers } => {
            let view = FormViewController::new(api);
            view.load(form_id).await?;
            let message = match view.plan() {
                Some(RenderPlan::Notice { .. }) => {
                    if !answers.answers.is_empty() {
                        tracing::warn!(%form_id, "notice forms take no answers; confirming only");
                    }
                    view.authenticate(student_id, auth_code).await?;
                    view.confirm_notice().await?
                }
                Some(RenderPlan::Survey(_)) => {
                    let mut survey =
                        view.survey_form().ok_or_else(|| CliError::Missing(EMPTY_SURVEY_MESSAGE.to_owned()))?;
                    fill_survey(&mut survey, &answers.answers)?;
                    view.authenticate(student_id, auth_code).await?;
                    view.submit_survey(&mut survey).await?
                }
                Some(RenderPlan::Empty) | None => return Err(CliError::Missing(EMPTY_SURVEY_MESSAGE.to_owned())),
            };
            println!("{message}");
            Ok(())
        }
        FormsSubcommand::Delete { form_id } => {
            let dashboard = DashboardController::new(api, config);
            dashboard.delete_form(form_id).await?;
            print_json(&serde_json::json!({ "deleted": form_id }))
        }
        FormsSubcommand::ShareLink { form_id } => {
            println!("{}", config.share_link(form_id));
            Ok(())
        }
        FormsSubcommand::NonResponders { form_id } => {
            let dashboard = DashboardController::new(api, config);
            let students = dashboard.non_responders(form_id).await?;
            print_json(&serde_json::to_value(students)?)
        }
    }
}

async fn run_folders(config: &ClientConfig, cmd: &FoldersCommand) -> Result<(), CliError> {
    let api = ApiClient::from_config(config)?;
    match &cmd.command {
        FoldersSubcommand::List => print_json(&serde_json::to_value(api.get_folders().await?)?),
        FoldersSubcommand::Create { name } => {
            let created = EditorController::new(api).create_folder(name).await?;
            print_json(&serde_json::to_value(created)?)
        }
    }
}

async fn run_responses(config: &ClientConfig, utc_offset: UtcOffset, cmd: &ResponsesCommand) -> Result<(), CliError> {
    let api = ApiClient::from_config(config)?;
    match &cmd.command {
        ResponsesSubcommand::List { form_id } => print_json(&serde_json::to_value(api.get_responses(form_id).await?)?),
        ResponsesSubcommand::Grid { form_id, html, output } => {
            let view = ResponsesController::new(api, utc_offset).load(form_id).await?;
            if view.grid.is_empty() {
                tracing::warn!(%form_id, "{}", forms::grid::EMPTY_GRID_MESSAGE);
            }
            let rendered = if *html { view.print_html() } else { view.grid.to_csv() };
            emit(&rendered, output.as_ref())
        }
        ResponsesSubcommand::Update { form_id, response_id, answers } => {
            let responses = ResponsesController::new(api, utc_offset);
            let view = responses.load(form_id).await?;
            let form = view.form.ok_or_else(|| CliError::Missing(LOAD_FAILED_MESSAGE.to_owned()))?;
            let row = view
                .grid
                .row(response_id)
                .ok_or_else(|| CliError::Missing(format!("response {response_id} not found")))?;
            let answer_data = merge_answers(form.fields(), row.answers.clone(), &answers.answers)?;
            let view = responses.update(form_id, response_id, answer_data).await?;
            let updated = view.grid.row(response_id).map(|r| &r.answers);
            print_json(&serde_json::json!({ "updated": response_id, "answers": updated }))
        }
        ResponsesSubcommand::Delete { form_id, response_id } => {
            let view = ResponsesController::new(api, utc_offset).delete(form_id, response_id).await?;
            print_json(&serde_json::json!({ "deleted": response_id, "remaining": view.grid.rows.len() }))
        }
    }
}

async fn run_students(config: &ClientConfig, cmd: &StudentsCommand) -> Result<(), CliError> {
    let students = StudentsController::new(ApiClient::from_config(config)?);
    match &cmd.command {
        StudentsSubcommand::List => print_json(&serde_json::to_value(students.load().await?)?),
        StudentsSubcommand::Add(args) => {
            let notice = students.add(&Registration::from(args.clone())).await?;
            println!("{notice}");
            Ok(())
        }
        StudentsSubcommand::Update { find_by_student_id, student_id, name, phone_student, phone_parent, email } => {
            let update = StudentUpdate {
                find_by_student_id: find_by_student_id.clone(),
                student_id: student_id.clone(),
                name: name.clone(),
                auth_code: None,
                phone_student: phone_student.as_deref().map(forms::format_phone),
                phone_parent: phone_parent.as_deref().map(forms::format_phone),
                email: email.clone(),
            };
            students.update(&update).await?;
            print_json(&serde_json::to_value(students.students())?)
        }
        StudentsSubcommand::Delete { student_id } => {
            students.delete(student_id).await?;
            print_json(&serde_json::json!({ "deleted": student_id }))
        }
        StudentsSubcommand::Roster { output } => emit(&students.roster_html().await?, output.as_ref()),
    }
}

async fn run_class(config: &ClientConfig, cmd: &ClassCommand) -> Result<(), CliError> {
    let students = StudentsController::new(ApiClient::from_config(config)?);
    let info = match &cmd.command {
        ClassSubcommand::Get => students.class_info().await?,
        ClassSubcommand::Set { grade, class_num, teacher } => {
            let info = ClassInfo {
                grade: grade.trim().to_owned(),
                class_num: class_num.trim().to_owned(),
                teacher_name: teacher.trim().to_owned(),
            };
            students.save_class_info(&info).await?
        }
    };
    print_json(&serde_json::to_value(info)?)
}

async fn run_sms(config: &ClientConfig, last_used: &LastUsed, cmd: &SmsCommand) -> Result<(), CliError> {
    let sms = SmsController::new(ApiClient::from_config(config)?);
    sms.load().await?;
    match &cmd.command {
        SmsSubcommand::Receivers { to } => {
            let (receivers, skipped) = sms.receivers(last_used.recipient(*to)?);
            print_json(&serde_json::json!({ "receivers": receivers, "skipped": skipped }))
        }
        SmsSubcommand::Send { to, message } => {
            let (notice, receipt) = sms.send(last_used.recipient(*to)?, message).await?;
            println!("{notice}");
            if let Some(receipt) = receipt {
                print_json(&serde_json::to_value(receipt)?)?;
            }
            Ok(())
        }
    }
}

// =============================================================================
// FIELDS AND ANSWERS
// =============================================================================

/// Apply `--body`, `--schema` and `--field` to a draft, in that order. A
/// schema's body is used only when `--body` is absent.
fn apply_fields(draft: &mut FormDraft, body: Option<&str>, args: &FieldArgs) -> Result<(), CliError> {
    if let Some(path) = &args.schema {
        let schema = read_schema(path)?;
        if body.is_none() {
            draft.description = schema.body.unwrap_or_default();
        }
        draft.replace_fields(schema.fields);
    }
    if let Some(body) = body {
        draft.description = body.to_owned();
    }
    for spec in &args.fields {
        add_field_spec(draft, spec)?;
    }
    if draft.form_type == FormType::Notice && !draft.fields().is_empty() {
        tracing::warn!(fields = draft.fields().len(), "notice forms are saved without fields");
    }
    for advisory in draft.advisories() {
        tracing::warn!(?advisory, "field needs attention");
    }
    Ok(())
}

fn read_schema(path: &Path) -> Result<FormSchema, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
    forms::parse_schema(&raw).ok_or_else(|| CliError::InvalidSchema(path.to_path_buf()))
}

fn add_field_spec(draft: &mut FormDraft, spec: &FieldSpec) -> Result<(), DraftError> {
    let id = draft.add_field();
    draft.set_field_type(&id, spec.field_type.clone())?;
    let patch = FieldPatch { label: Some(spec.label.clone()), required: Some(spec.required), ..FieldPatch::default() };
    draft.update_field(&id, patch)?;
    if spec.options.is_empty() {
        return Ok(());
    }
    // Listed options replace the seeded placeholder.
    draft.remove_option(&id, 0)?;
    for option in &spec.options {
        if option == OTHER_OPTION {
            draft.add_other_option(&id)?;
        } else {
            draft.add_option(&id, Some(option))?;
        }
    }
    Ok(())
}

/// Feed `--answer` values through the survey's input rules: radio selects,
/// checkbox toggles, `<id>_other` fills the 기타 text, anything else is text.
fn fill_survey(survey: &mut SurveyForm, answers: &[AnswerSpec]) -> Result<(), InputError> {
    for AnswerSpec { key, value } in answers {
        let field_type = survey.fields().iter().find(|f| f.id == *key).map(|f| f.field_type.clone());
        match field_type {
            Some(FieldType::Radio) => survey.select(key, value)?,
            Some(FieldType::Checkbox) => survey.toggle(key, value)?,
            Some(_) => survey.set_text(key, value.clone())?,
            None => {
                let owner = survey
                    .fields()
                    .iter()
                    .find(|f| f.other_key().as_deref() == Some(key.as_str()))
                    .map(|f| f.id.clone())
                    .ok_or_else(|| InputError::UnknownField(key.clone()))?;
                survey.set_other(&owner, value.clone())?;
            }
        }
    }
    Ok(())
}

/// Normalize the answered fields as a fresh submission and lay them over
/// `existing`.
fn merge_answers(fields: &[FormFieldSchema], mut existing: AnswerMap, answers: &[AnswerSpec]) -> Result<AnswerMap, CliError> {
    let touched: Vec<FormFieldSchema> = fields
        .iter()
        .filter(|f| answers.iter().any(|a| a.key == f.id || f.other_key().as_deref() == Some(a.key.as_str())))
        .cloned()
        .collect();
    let mut survey = SurveyForm::new(&FormSchema::survey(touched, None));
    fill_survey(&mut survey, answers)?;
    let edited = survey.submit().map_err(ControllerError::from)?;
    existing.extend(edited);
    Ok(existing)
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Write to `path` when given, else stdout.
fn emit(content: &str, path: Option<&PathBuf>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            std::fs::write(path, content).map_err(|source| CliError::Write { path: path.clone(), source })?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output");
            Ok(())
        }
        None => {
            print!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
