//! HTTP route handlers.
//!
//! Handlers are kept thin, delegating to [`ontomap_core::OntologyService`].

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::Json;

use ontomap_core::UploadRequest;

use super::error::ApiError;
use super::models::{
    BuildRequest, BuildResponse, GetOntologyResponse, ListOntologiesResponse, MapRequest,
    MapResponse, MappingRow, MessageResponse, OntologyGraphResponse, OntologyListItem,
    OntologyQuery, UploadDataResponse,
};
use super::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// GET `/` - health check.
pub async fn index() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Ontomap API is running".to_string(),
    })
}

// =============================================================================
// Mapping Handlers
// =============================================================================

/// POST `/api/v1/upload_data` - multipart upload of one CSV/JSON file.
///
/// Form fields: `file` (required), `ontology_classes` (comma-separated,
/// required), `ontology_id`, `relation_type`, `target_column`, `model_name`.
pub async fn upload_data(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<UploadDataResponse> {
    let mut request = UploadRequest::default();
    let mut classes: Option<String> = None;
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                request.file_name = field.file_name().unwrap_or_default().to_string();
                request.bytes = field.bytes().await?.to_vec();
                has_file = true;
            }
            "ontology_classes" => classes = Some(field.text().await?),
            "ontology_id" => request.ontology_id = Some(field.text().await?),
            "relation_type" => request.relation_type = Some(field.text().await?),
            "target_column" => request.target_column = Some(field.text().await?),
            "model_name" => request.model_name = Some(field.text().await?),
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    if !has_file {
        return Err(ApiError::bad_request("form field 'file' is required"));
    }
    let classes =
        classes.ok_or_else(|| ApiError::bad_request("form field 'ontology_classes' is required"))?;
    request.ontology_classes = classes.split(',').map(str::to_string).collect();

    let outcome = state.service.upload(request).await?;
    tracing::info!(
        ontology_id = %outcome.ontology_id,
        relations = outcome.relations_added,
        "upload complete"
    );
    Ok(Json(outcome.into()))
}

/// POST `/api/v1/build_hybrid_ontology` - map every CSV in the input folder.
pub async fn build_hybrid_ontology(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BuildRequest>,
) -> ApiResult<BuildResponse> {
    let outcome = state
        .service
        .build_from_folder(body.ontology_classes, body.model_name.as_deref())
        .await?;
    Ok(Json(outcome.into()))
}

/// POST `/api/v1/map` - classify names without storing anything.
pub async fn map_texts(
    State(state): State<Arc<AppState>>,
    Json(body): Json<MapRequest>,
) -> ApiResult<MapResponse> {
    let results = state
        .service
        .map_texts(body.texts, body.ontology_classes, body.model_name.as_deref())
        .await?;

    Ok(Json(MapResponse {
        message: "Mapping complete".to_string(),
        mapping_df: results.iter().map(MappingRow::from).collect(),
    }))
}

// =============================================================================
// Registry Handlers
// =============================================================================

/// GET `/api/v1/get_hybrid_ontology?ontology_id=...`
pub async fn get_hybrid_ontology(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OntologyQuery>,
) -> ApiResult<GetOntologyResponse> {
    let record = state.service.get(&query.ontology_id)?;
    Ok(Json(record.into()))
}

/// GET `/api/v1/list_ontologies` - newest first.
pub async fn list_ontologies(State(state): State<Arc<AppState>>) -> Json<ListOntologiesResponse> {
    let ontologies: Vec<OntologyListItem> = state
        .service
        .list()
        .into_iter()
        .map(OntologyListItem::from)
        .collect();

    Json(ListOntologiesResponse {
        message: "Ontologies listed".to_string(),
        total: ontologies.len(),
        ontologies,
    })
}

/// DELETE `/api/v1/ontologies/{id}`
pub async fn delete_ontology(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.service.delete(&id)?;
    Ok(Json(MessageResponse {
        message: format!("Ontology {id} deleted"),
    }))
}

/// GET `/api/v1/get_ontology_graph/{id}`
pub async fn get_ontology_graph(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<OntologyGraphResponse> {
    let graph = state.service.graph_view(&id)?;
    Ok(Json(OntologyGraphResponse::new(id, graph)))
}

/// GET `/api/v1/get_merged_ontology_graph` - every stored graph in one view.
pub async fn get_merged_ontology_graph(
    State(state): State<Arc<AppState>>,
) -> Json<OntologyGraphResponse> {
    let graph = state.service.merged_graph_view();
    Json(OntologyGraphResponse::new("merged", graph))
}
