//! Shared form, response and roster model for the homeroom toolkit.
//!
//! This crate owns the data shapes exchanged with the spreadsheet-backed
//! remote API and every pure transformation over them: schema parsing, the
//! builder's editing rules, the headless renderer with its answer
//! normalization, and the response grid projection used for display and
//! export. It performs no I/O so `client`, `cli` and tests share one
//! definition of the contract.

pub mod answer;
pub mod builder;
pub mod de;
pub mod grid;
pub mod html;
pub mod normalize;
pub mod phone;
pub mod records;
pub mod render;
pub mod roster;
pub mod schema;
pub mod sms;

pub use answer::{Answer, AnswerMap, notice_confirmation, parse_answer_data};
pub use builder::{Advisory, Direction, DraftError, FieldPatch, FormDraft};
pub use grid::{Column, ColumnKey, DEFAULT_UTC_OFFSET, GridRow, ResponseGrid, format_submitted_at};
pub use normalize::{RawInput, RawValue, normalize};
pub use phone::format_korean as format_phone;
pub use records::{
    AuthenticatedStudent, ClassInfo, CreateFormParams, CreatedFolder, CreatedForm, Folder, IssuedStudent, NewStudent,
    ResponseRow, SendSmsParams, SmsLog, SmsReceipt, SmsReceiver, Student, StudentUpdate, SubmitResponseParams,
    SubmittedResponse, UpdateFormParams, UpdateResponseParams,
};
pub use render::{Control, FieldControl, FieldError, InputError, NoticeBody, RenderPlan, SubmitError, SurveyForm, render};
pub use roster::{roster_html, roster_title};
pub use schema::{FieldType, Form, FormFieldSchema, FormSchema, FormType, OTHER_OPTION, ParsedForm, other_key, parse_schema};
pub use sms::{RecipientType, SmsError};
