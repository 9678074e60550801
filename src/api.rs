use std::path::{Path, PathBuf};
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    app_state::{AppState, Status},
    extract,
    models::{FileCategory, FileTreeNode},
    report,
};

/// Extensiones que se muestran en el selector de ficheros del frontend.
/// PDF figura aquí aunque su contenido no se extraiga.
const SUPPORTED_EXTENSIONS: &[&str] = &["docx", "doc", "xlsx", "xls", "csv", "pdf"];

// --- Payloads y Respuestas de la API ---

#[derive(Deserialize)]
pub struct ListDirPayload {
    path: String,
}

#[derive(Deserialize)]
pub struct AnalyzePayload {
    path: String,
    #[serde(default)]
    industry: String,
    #[serde(default)]
    objective: String,
}

/// La respuesta incluye las etiquetas efectivas para rellenar los campos
/// del formulario tras el análisis.
#[derive(Serialize)]
pub struct AnalyzeResponse {
    report: String,
    status: String,
    industry: String,
    objective: String,
}

#[derive(Deserialize)]
pub struct RecommendPayload {
    #[serde(default)]
    industry: String,
    #[serde(default)]
    objective: String,
}

#[derive(Serialize)]
pub struct RecommendResponse {
    report: String,
    status: String,
}

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/list-directory", post(list_directory_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/recommend", post(recommend_handler))
        .route("/api/status", get(status_handler))
        .route("/api/shutdown", post(shutdown_handler))
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn list_directory_handler(
    Json(payload): Json<ListDirPayload>,
) -> Result<Json<FileTreeNode>, (StatusCode, Json<serde_json::Value>)> {
    let path = if payload.path.is_empty() {
        dirs::home_dir().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "No se pudo determinar el directorio home del usuario."})),
            )
        })?
    } else {
        PathBuf::from(&payload.path)
    };

    if !path.is_dir() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "La ruta proporcionada no es un directorio válido."})),
        ));
    }

    match build_file_tree(&path) {
        Ok(tree) => Ok(Json(tree)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": format!("Error al leer el directorio: {}", e)})),
        )),
    }
}

#[axum::debug_handler]
async fn analyze_handler(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzePayload>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, Json<serde_json::Value>)> {
    let path = PathBuf::from(&payload.path);
    if payload.path.is_empty() || !path.is_file() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "La ruta proporcionada no es un fichero válido."})),
        ));
    }

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| payload.path.clone());

    let size_bytes = std::fs::metadata(&path)
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("No se pudieron leer los metadatos del fichero: {}", e)})),
            )
        })?
        .len();

    set_status(&state, true, format!("Analizando: {file_name}..."), 0.1);

    let category = FileCategory::from_path(&path);
    let text = extract::extract_file(&path, category);
    set_status(&state, true, format!("Clasificando contenido de {file_name}..."), 0.5);

    // Texto vacío o centinela de tipo no soportado: se omite la clasificación.
    let classification = if text.is_empty() || category == FileCategory::Other {
        Default::default()
    } else {
        state.classifier.classify(&text)
    };

    // Las etiquetas extraídas prevalecen; si faltan, valen las del formulario.
    let industry = if classification.industry.is_empty() {
        payload.industry.clone()
    } else {
        classification.industry.clone()
    };
    let objective = if classification.objective.is_empty() {
        payload.objective.clone()
    } else {
        classification.objective.clone()
    };

    set_status(&state, true, "Generando recomendación...".to_string(), 0.8);
    let record = state.advisor.recommend(&industry, &objective);
    let markdown = report::analysis_report(
        &path,
        category,
        size_bytes,
        &classification.industry,
        &classification.objective,
        &record,
    );

    let status_message = format!("Análisis completado: {file_name}");
    set_status(&state, false, status_message.clone(), 0.0);
    info!(
        "Fichero {} analizado: industria '{}', objetivo '{}', metodología '{}'",
        path.display(),
        industry,
        objective,
        record.title
    );

    Ok(Json(AnalyzeResponse {
        report: markdown,
        status: status_message,
        industry,
        objective,
    }))
}

#[axum::debug_handler]
async fn recommend_handler(
    State(state): State<AppState>,
    Json(payload): Json<RecommendPayload>,
) -> Json<RecommendResponse> {
    let record = state.advisor.recommend(&payload.industry, &payload.objective);
    let markdown = report::recommendation_report(&record);
    let status = format!("Recomendación generada: {}", record.title);
    info!(
        "Recomendación directa: industria '{}', objetivo '{}' -> '{}'",
        payload.industry, payload.objective, record.title
    );

    Json(RecommendResponse {
        report: markdown,
        status,
    })
}

#[axum::debug_handler]
async fn status_handler(State(state): State<AppState>) -> Json<Status> {
    Json(state.status.lock().unwrap().clone())
}

#[axum::debug_handler]
async fn shutdown_handler(State(state): State<AppState>) -> impl IntoResponse {
    info!("Petición de apagado recibida.");
    if let Some(sender) = state.shutdown_sender.lock().unwrap().take() {
        let _ = sender.send(());
    }
    StatusCode::OK
}

// --- Utilidades ---

fn set_status(state: &AppState, is_busy: bool, message: String, progress: f32) {
    let mut status = state.status.lock().unwrap();
    status.is_busy = is_busy;
    status.message = message;
    status.progress = progress;
}

/// Árbol de un nivel con los subdirectorios y los ficheros de tipos
/// soportados, directorios primero.
fn build_file_tree(path: &Path) -> std::io::Result<FileTreeNode> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let is_dir = metadata.is_dir();
    let mut children = Vec::new();

    if is_dir {
        let mut entries: Vec<_> = std::fs::read_dir(path)?
            .filter_map(Result::ok)
            .filter(|entry| {
                let entry_path = entry.path();
                if entry_path.is_dir() {
                    return true;
                }
                entry_path
                    .extension()
                    .and_then(std::ffi::OsStr::to_str)
                    .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();

        entries.sort_by(|a, b| {
            let a_is_dir = a.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            let b_is_dir = b.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            b_is_dir.cmp(&a_is_dir).then_with(|| a.file_name().cmp(&b.file_name()))
        });

        for entry in entries {
            if let Ok(entry_meta) = entry.metadata() {
                children.push(FileTreeNode {
                    path: entry.path(),
                    name: entry.file_name().to_string_lossy().to_string(),
                    is_dir: entry_meta.is_dir(),
                    children: Vec::new(),
                });
            }
        }
    }

    Ok(FileTreeNode {
        path: path.to_path_buf(),
        name,
        is_dir,
        children,
    })
}
