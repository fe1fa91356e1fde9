use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{Html, IntoResponse, Response};
use axum::{
    Form, Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::app::AppState;
use crate::date::today_label;
use crate::error::AppError;
use crate::models::item::{CompletedItem, Item};
use crate::models::list::{List, ListName};
use crate::routes::index::render_main;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_default_list).post(add_item))
        .route("/completed", get(get_completed))
        .route("/delete", post(complete_item))
        .route("/{list_name}", get(get_named_list))
        .with_state(state)
}

#[derive(Template)]
#[template(path = "list.html")]
struct ListTemplate<'a> {
    title: &'a str,
    items: &'a [Item],
}

#[derive(Template)]
#[template(path = "completed.html")]
struct CompletedTemplate<'a> {
    title: &'a str,
    completed_items: &'a [CompletedItem],
}

/// Redirect with 302 Found, which is what browsers expect after a form post.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

async fn get_default_list(State(state): State<AppState>) -> Result<Response, AppError> {
    show_list(state, ListName::Default).await
}

async fn get_named_list(
    State(state): State<AppState>,
    Path(list_name): Path<String>,
) -> Result<Response, AppError> {
    show_list(state, ListName::from_path_segment(&list_name)).await
}

async fn show_list(state: AppState, list_name: ListName) -> Result<Response, AppError> {
    let list = List::fetch(state.database_connection.clone(), &list_name).await?;
    let seed_items = &state.config.seed_items;
    let needs_seed = match &list {
        None => true,
        Some(list) => {
            list_name.reseeds_when_empty() && list.items.is_empty() && !seed_items.is_empty()
        }
    };

    if needs_seed {
        List::seed(state.database_connection.clone(), &list_name, seed_items).await?;
        return Ok(found(&list_name.path()));
    }

    let items = list.map(|list| list.items).unwrap_or_default();
    let title = list_name.title(&today_label());
    let content = ListTemplate {
        title: &title,
        items: &items,
    }
    .render()?;
    Ok(Html(render_main(&title, &content)?).into_response())
}

async fn get_completed(State(state): State<AppState>) -> Result<Response, AppError> {
    let completed_items = CompletedItem::fetch_all(state.database_connection).await?;
    let title = "Completed Tasks";
    let content = CompletedTemplate {
        title,
        completed_items: &completed_items,
    }
    .render()?;
    Ok(Html(render_main(title, &content)?).into_response())
}

#[derive(Deserialize, Debug)]
struct NewItemForm {
    #[serde(rename = "newItem")]
    new_item: String,
    list: String,
}

async fn add_item(
    State(state): State<AppState>,
    Form(form): Form<NewItemForm>,
) -> Result<Response, AppError> {
    let list_name = ListName::from_title(&form.list, &today_label());
    let item = List::add_item(state.database_connection, &list_name, &form.new_item).await?;
    log::debug!("Added item {} to list {}", item.id, list_name);
    Ok(found(&list_name.path()))
}

#[derive(Deserialize, Debug)]
struct CompleteItemForm {
    checkbox: i64,
    #[serde(rename = "listName")]
    list_name: String,
}

async fn complete_item(
    State(state): State<AppState>,
    Form(form): Form<CompleteItemForm>,
) -> Result<Response, AppError> {
    let list_name = ListName::from_title(&form.list_name, &today_label());
    List::complete_item(state.database_connection, &list_name, form.checkbox).await?;
    Ok(found(&list_name.path()))
}
