//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extract_document;
use crate::screening::normalizer::normalize;
use crate::screening::ranker::{Document, RankingReport, SkipReason};
use crate::screening::skills::{compare_skills, spot_skills, SkillReport};
use crate::state::AppState;

/// Multipart field carrying the job description text.
pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
/// Multipart field name used for each resume file.
pub const RESUME_FIELD: &str = "resumes";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScreenTextRequest {
    pub job_description: String,
    pub documents: Vec<Document>,
}

/// Score at or above which a resume reads as a strong match.
pub const STRONG_MATCH: f64 = 0.70;
/// Score at or above which a resume is worth a manual review.
pub const CONSIDER_MATCH: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Consider,
    Weak,
}

impl MatchBand {
    pub fn from_score(score: f64) -> Self {
        if score >= STRONG_MATCH {
            MatchBand::Strong
        } else if score >= CONSIDER_MATCH {
            MatchBand::Consider
        } else {
            MatchBand::Weak
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub id: String,
    pub score: f64,
    /// Display form of the score, e.g. "42.17%".
    pub score_percent: String,
    pub match_band: MatchBand,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<SkillReport>,
}

#[derive(Debug, Serialize)]
pub struct SkippedRow {
    pub id: String,
    pub reason: SkipReason,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ScreeningResponse {
    pub run_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub rankings: Vec<RankingRow>,
    pub skipped: Vec<SkippedRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screen
///
/// Multipart upload: one `job_description` text field plus one `resumes` file
/// field per resume. Returns resumes ranked by similarity to the JD.
pub async fn handle_screen_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScreeningResponse>, AppError> {
    let mut job_description = String::new();
    let mut uploads: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(JOB_DESCRIPTION_FIELD) => job_description = field.text().await?,
            Some(RESUME_FIELD) => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("resume-{}", uploads.len() + 1));
                let bytes = field.bytes().await?;
                uploads.push((file_name, bytes));
            }
            other => debug!(field = ?other, "Ignoring unknown multipart field"),
        }
    }

    // Reject bad batches before spending time on extraction.
    state.ranker.validate(&job_description, uploads.len())?;

    let mut documents = Vec::with_capacity(uploads.len());
    for (file_name, bytes) in uploads {
        documents.push(extract_document(state.extractors.clone(), file_name, bytes).await);
    }

    screen(&state, job_description, documents).await.map(Json)
}

/// POST /api/v1/screen/text
///
/// Same pipeline for clients that extract text themselves.
pub async fn handle_screen_text(
    State(state): State<AppState>,
    Json(request): Json<ScreenTextRequest>,
) -> Result<Json<ScreeningResponse>, AppError> {
    screen(&state, request.job_description, request.documents)
        .await
        .map(Json)
}

async fn screen(
    state: &AppState,
    job_description: String,
    documents: Vec<Document>,
) -> Result<ScreeningResponse, AppError> {
    let run_id = Uuid::new_v4();
    info!(%run_id, documents = documents.len(), "Screening batch");

    // CPU-bound normalization and scoring run off the async executor.
    let ranker = state.ranker.clone();
    let include_skills = state.config.include_skills;
    let (report, documents, job_description) = tokio::task::spawn_blocking(move || {
        let report = ranker.screen(&job_description, &documents);
        (report, documents, job_description)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in ranking: {e}")))?;
    let report = report?;

    let skills = include_skills.then(|| skill_reports(&job_description, &documents, &report));

    Ok(build_response(run_id, report, skills))
}

/// One skill report per ranked entry, in ranked order.
fn skill_reports(
    job_description: &str,
    documents: &[Document],
    report: &RankingReport,
) -> Vec<SkillReport> {
    let jd_skills = spot_skills(&normalize(job_description));
    report
        .ranked
        .iter()
        .map(|entry| {
            let resume_skills = spot_skills(&normalize(&documents[entry.input_index].text));
            compare_skills(&jd_skills, &resume_skills)
        })
        .collect()
}

fn build_response(
    run_id: Uuid,
    report: RankingReport,
    skills: Option<Vec<SkillReport>>,
) -> ScreeningResponse {
    let mut skills = skills.map(Vec::into_iter);

    let rankings = report
        .ranked
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RankingRow {
            rank: i + 1,
            score_percent: format_percent(entry.result.score),
            match_band: MatchBand::from_score(entry.result.score),
            id: entry.result.id,
            score: entry.result.score,
            skills: skills.as_mut().and_then(Iterator::next),
        })
        .collect();

    let skipped = report
        .skipped
        .into_iter()
        .map(|s| SkippedRow {
            id: s.id,
            message: s.reason.describe(),
            reason: s.reason,
        })
        .collect();

    ScreeningResponse {
        run_id,
        analyzed_at: Utc::now(),
        rankings,
        skipped,
    }
}

fn format_percent(score: f64) -> String {
    format!("{:.2}%", score * 100.0)
}
