use askama_axum::Template;
use axum::{extract::State, Form};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::AppError,
    report,
    routes::AppState,
    types::{ClassifyResponse, Label},
};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    message: String,
    model_version: String,
    view: ResultView,
}

pub enum ResultView {
    Waiting(String),
    Warning(String),
    Report(ReportView),
}

pub struct ReportView {
    is_spam: bool,
    ham_percent: String,
    spam_percent: String,
    ham_bar: String,
    spam_bar: String,
    keywords: Vec<KeywordLine>,
    summary: String,
}

pub struct KeywordLine {
    term: String,
    weight: String,
}

impl From<ClassifyResponse> for ReportView {
    fn from(response: ClassifyResponse) -> Self {
        let p = &response.prediction;
        Self {
            is_spam: p.label == Label::Spam,
            ham_percent: report::percent(p.ham_prob),
            spam_percent: report::percent(p.spam_prob),
            ham_bar: report::bar_width(p.ham_prob),
            spam_bar: report::bar_width(p.spam_prob),
            keywords: response
                .explanation
                .entries
                .iter()
                .map(|e| KeywordLine {
                    term: e.term.clone(),
                    weight: report::weight(e.weight),
                })
                .collect(),
            summary: response.summary,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifyForm {
    #[serde(default)]
    message: String,
}

pub async fn index(State(engine): State<AppState>) -> IndexTemplate {
    IndexTemplate {
        message: String::new(),
        model_version: engine.model_info().model_version,
        view: ResultView::Waiting(report::WAITING_MESSAGE.to_string()),
    }
}

pub async fn submit(
    State(engine): State<AppState>,
    Form(form): Form<ClassifyForm>,
) -> Result<IndexTemplate, AppError> {
    let view = match engine.classify(&form.message) {
        Ok(response) => {
            info!("Page classification {} -> {}", response.request_id, response.prediction.label);
            ResultView::Report(response.into())
        }
        Err(AppError::InvalidInput(warning)) => ResultView::Warning(warning),
        Err(e) => return Err(e),
    };

    Ok(IndexTemplate {
        message: form.message,
        model_version: engine.model_info().model_version,
        view,
    })
}
