use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Multipart, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use petboard_store::{PetCollection, StoreResult};
use petboard_types::{Partition, PetRecord, PetRef, TypeError};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::flash::{self, Flash};
use crate::form::{read_failure_message, CreateForm, EditForm, RefForm};
use crate::state::AppState;
use crate::view;

pub const PET_ADDED: &str = "Pet added successfully!";
pub const PET_ADOPTED: &str = "Pet marked as adopted.";
pub const PET_DELETED: &str = "Pet deleted.";
pub const PET_UPDATED: &str = "Pet details updated.";

/// `GET /` -- the listing page.
pub async fn list_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let records = state.store.load_or_empty();
    render_page(&state, &headers, &records, Vec::new())
}

/// `POST /` -- validate, upload the photo, then append the new record.
pub async fn create_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let form = match multipart {
        Ok(multipart) => match CreateForm::from_multipart(multipart).await {
            Ok(form) => form,
            Err(e) => {
                warn!(error = %e, status = %e.status(), "could not read pet submission");
                let records = state.store.load_or_empty();
                let errors = vec![read_failure_message(&e).to_string()];
                return render_page(&state, &headers, &records, errors);
            }
        },
        Err(e) => {
            debug!(error = %e, "create request is not multipart");
            CreateForm::default()
        }
    };

    let (draft, photo) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            debug!(?errors, "rejected pet submission");
            let records = state.store.load_or_empty();
            return render_page(&state, &headers, &records, errors);
        }
    };

    let image_url = match state.uploader.upload(photo).await {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, filename = %photo.filename, "photo upload failed");
            let records = state.store.load_or_empty();
            let errors = vec![format!("Failed to upload image to S3: {e}")];
            return render_page(&state, &headers, &records, errors);
        }
    };

    // A failed read here must not be saved over; the photo stays orphaned.
    let mut pets = match state.store.load() {
        Ok(records) => PetCollection::new(records),
        Err(e) => {
            warn!(error = %e, "cannot load pet records; not adding pet");
            let errors = vec![format!("Could not read pet records: {e}")];
            return render_page(&state, &headers, &[], errors);
        }
    };
    let record = draft.into_record(image_url);
    let id = record.id;
    pets.append(record);
    if let Err(e) = state.store.save(pets.records()) {
        error!(error = %e, "failed to save pet records");
        let records = state.store.load_or_empty();
        let errors = vec![format!("Could not save pet: {e}")];
        return render_page(&state, &headers, &records, errors);
    }

    info!(pet = %id, count = pets.len(), "pet added");
    redirect_with(&state, &headers, Some(Flash::success(PET_ADDED)))
}

/// `POST /adopt`
pub async fn adopt_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<RefForm>, FormRejection>,
) -> Response {
    let target = form_target(form.map(|Form(f)| f.pet_ref()));
    let changed = apply_mutation(&state, "adopt", target, |pets, pet| {
        pets.adopt(pet).map(|_| ())
    });
    redirect_with(&state, &headers, changed.then(|| Flash::success(PET_ADOPTED)))
}

/// `POST /delete`
pub async fn delete_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<RefForm>, FormRejection>,
) -> Response {
    let target = form_target(form.map(|Form(f)| f.pet_ref()));
    let changed = apply_mutation(&state, "delete", target, |pets, pet| {
        pets.remove(pet).map(|_| ())
    });
    redirect_with(&state, &headers, changed.then(|| Flash::success(PET_DELETED)))
}

/// `POST /edit`
pub async fn edit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<EditForm>, FormRejection>,
) -> Response {
    let (target, edit) = match form {
        Ok(Form(f)) => (f.pet_ref(), f.edit()),
        Err(e) => (Err(TypeError::InvalidReference(e.body_text())), Default::default()),
    };
    let changed = apply_mutation(&state, "edit", target, |pets, pet| {
        pets.edit(pet, &edit).map(|_| ())
    });
    redirect_with(&state, &headers, changed.then(|| Flash::success(PET_UPDATED)))
}

/// `GET /health`
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "petboard-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn form_target(
    parsed: Result<Result<PetRef, TypeError>, FormRejection>,
) -> Result<PetRef, TypeError> {
    parsed.unwrap_or_else(|e| Err(TypeError::InvalidReference(e.body_text())))
}

/// Load, mutate, save. Returns `true` only when a change was persisted.
///
/// Unparseable or unresolved references are not errors to the user: the
/// request still redirects, just without a notice.
fn apply_mutation<F>(
    state: &AppState,
    action: &'static str,
    target: Result<PetRef, TypeError>,
    mutate: F,
) -> bool
where
    F: FnOnce(&mut PetCollection, PetRef) -> StoreResult<()>,
{
    let target = match target {
        Ok(target) => target,
        Err(e) => {
            debug!(action, error = %e, "ignoring unparseable pet reference");
            return false;
        }
    };
    let mut pets = match state.store.load() {
        Ok(records) => PetCollection::new(records),
        Err(e) => {
            warn!(action, error = %e, "cannot load pet records; skipping");
            return false;
        }
    };
    if let Err(e) = mutate(&mut pets, target) {
        debug!(action, %target, error = %e, "ignoring unresolved pet reference");
        return false;
    }
    if let Err(e) = state.store.save(pets.records()) {
        error!(action, %target, error = %e, "failed to save pet records");
        return false;
    }
    info!(action, %target, "pet records updated");
    true
}

/// Render the listing, consuming any pending notices.
fn render_page(
    state: &AppState,
    headers: &HeaderMap,
    records: &[PetRecord],
    errors: Vec<String>,
) -> Response {
    let flashes = state.flash_key.read(headers);
    let body = view::render_listing(&Partition::from_records(records), &flashes, &errors);
    if flash::has_flash_cookie(headers) {
        ([(SET_COOKIE, flash::clear_cookie())], Html(body)).into_response()
    } else {
        Html(body).into_response()
    }
}

/// `303 See Other` back to the listing, queueing `notice` if given.
fn redirect_with(state: &AppState, headers: &HeaderMap, notice: Option<Flash>) -> Response {
    match notice {
        Some(notice) => {
            let mut flashes = state.flash_key.read(headers);
            flashes.push(notice);
            let cookie = state.flash_key.set_cookie(&flashes);
            ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        None => Redirect::to("/").into_response(),
    }
}
