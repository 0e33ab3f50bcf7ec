//! Article pages: list, show, create, edit, delete.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;

use crate::app::controllers::{not_found, page_context, read_form, record_id};
use crate::app::forms::{ArticleForm, FieldErrors};
use crate::app::models::{Article, User};
use crate::app::views::{self, ArticleFormMode};
use crate::app::AppState;
use crate::http::response::{html, redirect};
use crate::routing::PathParams;

fn with_authors(state: &AppState, articles: Vec<Article>) -> Vec<(Article, Option<User>)> {
    articles
        .into_iter()
        .map(|article| {
            let author = article.user_id.and_then(|uid| state.users.get(uid).ok());
            (article, author)
        })
        .collect()
}

pub async fn index(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let articles = with_authors(&state, state.articles.all());
    html(StatusCode::OK, views::articles_index(&ctx, &articles))
}

pub async fn show(state: AppState, req: Request<Body>, params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let Some(id) = record_id(&params) else {
        return not_found(&ctx);
    };
    match state.articles.get(id) {
        Ok(article) => {
            let author = article.user_id.and_then(|uid| state.users.get(uid).ok());
            html(StatusCode::OK, views::article_show(&ctx, &article, author.as_ref()))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Article lookup failed");
            not_found(&ctx)
        }
    }
}

pub async fn create(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    html(
        StatusCode::OK,
        views::article_form(
            &ctx,
            ArticleFormMode::Create,
            &ArticleForm::default(),
            &FieldErrors::new(),
        ),
    )
}

pub async fn store(state: AppState, req: Request<Body>, _params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let form: ArticleForm = match read_form(&ctx, req).await {
        Ok(form) => form,
        Err(page) => return page,
    };

    if let Err(errors) = form.check() {
        tracing::debug!(fields = ?errors.keys().collect::<Vec<_>>(), "Article form invalid");
        return html(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::article_form(&ctx, ArticleFormMode::Create, &form, &errors),
        );
    }

    let author = ctx.user.as_ref().map(|u| u.id);
    let article = state.articles.create(&form.title, &form.body, author);
    redirect(&article.link(&ctx.urls))
}

pub async fn edit(state: AppState, req: Request<Body>, params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let Some(article) = record_id(&params).and_then(|id| state.articles.get(id).ok()) else {
        return not_found(&ctx);
    };
    let form = ArticleForm {
        title: article.title,
        body: article.body,
    };
    html(
        StatusCode::OK,
        views::article_form(&ctx, ArticleFormMode::Edit(article.id), &form, &FieldErrors::new()),
    )
}

pub async fn update(state: AppState, req: Request<Body>, params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let Some(id) = record_id(&params).filter(|&id| state.articles.get(id).is_ok()) else {
        return not_found(&ctx);
    };
    let form: ArticleForm = match read_form(&ctx, req).await {
        Ok(form) => form,
        Err(page) => return page,
    };

    if let Err(errors) = form.check() {
        return html(
            StatusCode::UNPROCESSABLE_ENTITY,
            views::article_form(&ctx, ArticleFormMode::Edit(id), &form, &errors),
        );
    }

    match state.articles.update(id, &form.title, &form.body) {
        Ok(article) => redirect(&article.link(&ctx.urls)),
        Err(e) => {
            tracing::debug!(error = %e, "Article vanished before update");
            not_found(&ctx)
        }
    }
}

pub async fn delete(state: AppState, req: Request<Body>, params: PathParams) -> Response {
    let ctx = page_context(&state, &req);
    let Some(id) = record_id(&params) else {
        return not_found(&ctx);
    };
    match state.articles.delete(id) {
        Ok(_) => redirect(&ctx.urls.name_to_url("articles.index", &[])),
        Err(e) => {
            tracing::debug!(error = %e, "Article delete failed");
            not_found(&ctx)
        }
    }
}
