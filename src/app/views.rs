//! HTML rendering.
//!
//! Every page goes through [`layout`], which draws the navigation bar with
//! the current user. Links are built with the request's [`UrlResolver`], so
//! a route that fails to resolve renders as an empty `href` instead of
//! breaking the page. All user-supplied text is escaped.

use std::fmt::Write;

use crate::app::forms::{ArticleForm, FieldErrors, RegistrationForm};
use crate::app::models::{Article, User};
use crate::http::response::escape_html;
use crate::routing::UrlResolver;

/// What every page needs besides its own data.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub urls: UrlResolver,
    pub user: Option<User>,
}

impl PageContext {
    fn url(&self, name: &str) -> String {
        self.urls.name_to_url(name, &[])
    }

    fn url_for(&self, name: &str, id: u64) -> String {
        self.urls.name_to_url(name, &["id", &id.to_string()])
    }
}

fn nav(ctx: &PageContext) -> String {
    let mut out = format!(
        concat!(
            r#"<nav><a href="{home}">Blog</a> <a href="{index}">Articles</a>"#,
            r#" <a href="{about}">About</a>"#,
        ),
        home = ctx.url("home"),
        index = ctx.url("articles.index"),
        about = ctx.url("about"),
    );
    match &ctx.user {
        Some(user) => {
            let _ = write!(
                out,
                concat!(
                    r#" <a href="{create}">Write</a> <a href="{profile}">{name}</a>"#,
                    r#" <form method="post" action="{logout}" class="inline">"#,
                    r#"<button type="submit">Log out</button></form>"#,
                ),
                create = ctx.url("articles.create"),
                profile = user.link(&ctx.urls),
                name = escape_html(&user.name),
                logout = ctx.url("auth.logout"),
            );
        }
        None => {
            let _ = write!(
                out,
                r#" <a href="{login}">Log in</a> <a href="{register}">Register</a>"#,
                login = ctx.url("auth.login"),
                register = ctx.url("auth.register"),
            );
        }
    }
    out.push_str("</nav>");
    out
}

pub fn layout(ctx: &PageContext, title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<link rel="stylesheet" href="/css/app.css">
</head>
<body>
{nav}
<main>
{content}
</main>
<script src="/js/app.js"></script>
</body>
</html>
"#,
        title = escape_html(title),
        nav = nav(ctx),
        content = content,
    )
}

fn field_error(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|messages| {
            messages
                .iter()
                .map(|m| format!(r#"<p class="error">{}</p>"#, escape_html(m)))
                .collect()
        })
        .unwrap_or_default()
}

fn author_link(ctx: &PageContext, author: Option<&User>) -> String {
    match author {
        Some(user) => format!(
            r#"<a href="{}" class="author">{}</a>"#,
            user.link(&ctx.urls),
            escape_html(&user.name)
        ),
        None => String::from(r#"<span class="author">anonymous</span>"#),
    }
}

fn article_list(ctx: &PageContext, articles: &[(Article, Option<User>)]) -> String {
    if articles.is_empty() {
        return String::from("<p>No articles yet.</p>");
    }
    let mut out = String::from("<ul class=\"articles\">");
    for (article, author) in articles {
        let _ = write!(
            out,
            r#"<li><a href="{link}">{title}</a> by {author}</li>"#,
            link = article.link(&ctx.urls),
            title = escape_html(&article.title),
            author = author_link(ctx, author.as_ref()),
        );
    }
    out.push_str("</ul>");
    out
}

pub fn articles_index(ctx: &PageContext, articles: &[(Article, Option<User>)]) -> String {
    let content = format!("<h1>Articles</h1>\n{}", article_list(ctx, articles));
    layout(ctx, "Articles", &content)
}

pub fn article_show(ctx: &PageContext, article: &Article, author: Option<&User>) -> String {
    let content = format!(
        r#"<article>
<h1>{title}</h1>
<p class="meta">by {author}</p>
<div class="body">{body}</div>
</article>
<p><a href="{edit}">Edit</a></p>
<form method="post" action="{delete}"><button type="submit">Delete</button></form>"#,
        title = escape_html(&article.title),
        author = author_link(ctx, author),
        body = escape_html(&article.body),
        edit = ctx.url_for("articles.edit", article.id),
        delete = ctx.url_for("articles.delete", article.id),
    );
    layout(ctx, &article.title, &content)
}

/// Which form an [`article_form`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleFormMode {
    Create,
    Edit(u64),
}

pub fn article_form(
    ctx: &PageContext,
    mode: ArticleFormMode,
    form: &ArticleForm,
    errors: &FieldErrors,
) -> String {
    let (heading, action) = match mode {
        ArticleFormMode::Create => ("New article", ctx.url("articles.store")),
        ArticleFormMode::Edit(id) => ("Edit article", ctx.url_for("articles.update", id)),
    };
    let content = format!(
        r#"<h1>{heading}</h1>
<form method="post" action="{action}">
<label for="title">Title</label>
<input type="text" id="title" name="title" value="{title}">
{title_error}
<label for="body">Body</label>
<textarea id="body" name="body">{body}</textarea>
{body_error}
<button type="submit">Save</button>
</form>"#,
        title = escape_html(&form.title),
        title_error = field_error(errors, "title"),
        body = escape_html(&form.body),
        body_error = field_error(errors, "body"),
    );
    layout(ctx, heading, &content)
}

pub fn user_show(ctx: &PageContext, user: &User, articles: &[Article]) -> String {
    let listed: Vec<(Article, Option<User>)> = articles
        .iter()
        .map(|a| (a.clone(), Some(user.clone())))
        .collect();
    let content = format!(
        "<h1>{name}</h1>\n<h2>Articles</h2>\n{list}",
        name = escape_html(&user.name),
        list = article_list(ctx, &listed),
    );
    layout(ctx, &user.name, &content)
}

pub fn register(ctx: &PageContext, form: &RegistrationForm, errors: &FieldErrors) -> String {
    let content = format!(
        r#"<h1>Register</h1>
<form method="post" action="{action}">
<label for="name">Name</label>
<input type="text" id="name" name="name" value="{name}">
{name_error}
<label for="email">Email</label>
<input type="email" id="email" name="email" value="{email}">
{email_error}
<label for="password">Password</label>
<input type="password" id="password" name="password">
{password_error}
<label for="password_confirm">Confirm password</label>
<input type="password" id="password_confirm" name="password_confirm">
{confirm_error}
<button type="submit">Register</button>
</form>"#,
        action = ctx.url("auth.doregister"),
        name = escape_html(&form.name),
        name_error = field_error(errors, "name"),
        email = escape_html(&form.email),
        email_error = field_error(errors, "email"),
        password_error = field_error(errors, "password"),
        confirm_error = field_error(errors, "password_confirm"),
    );
    layout(ctx, "Register", &content)
}

pub fn login(ctx: &PageContext, email: &str, error: Option<&str>) -> String {
    let error = error
        .map(|e| format!(r#"<p class="error">{}</p>"#, escape_html(e)))
        .unwrap_or_default();
    let content = format!(
        r#"<h1>Log in</h1>
{error}
<form method="post" action="{action}">
<label for="email">Email</label>
<input type="email" id="email" name="email" value="{email}">
<label for="password">Password</label>
<input type="password" id="password" name="password">
<button type="submit">Log in</button>
</form>"#,
        action = ctx.url("auth.dologin"),
        email = escape_html(email),
    );
    layout(ctx, "Log in", &content)
}

pub fn about(ctx: &PageContext) -> String {
    layout(
        ctx,
        "About",
        "<h1>About</h1>\n<p>A small blog for writing and sharing short articles.</p>",
    )
}

pub fn not_found(ctx: &PageContext) -> String {
    layout(
        ctx,
        "Page not found",
        "<h1>404</h1>\n<p>The page you asked for does not exist.</p>",
    )
}

/// Shown when a submission could not be decoded at all.
pub fn bad_request(ctx: &PageContext) -> String {
    layout(
        ctx,
        "Bad request",
        "<h1>Bad request</h1>\n<p>The submitted form could not be read.</p>",
    )
}

pub fn server_error(ctx: &PageContext) -> String {
    layout(
        ctx,
        "Server error",
        "<h1>500</h1>\n<p>Something went wrong. Please try again later.</p>",
    )
}
