//! Built-in HTML renderer for the admin pages.
//!
//! Every page is executed through the `layout` entry, which lists pending
//! flashes and then expands the nested templates of [`Page::nested`] in order.

use std::fmt::Write as _;

use quick_xml::escape::escape;

use crate::domain::{LAYOUT_ENTRY, Page, PageRenderer, RenderContext, RenderError, User};

/// Renders admin pages to HTML strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl PageRenderer for HtmlRenderer {
    fn render(&self, page: Page, context: &RenderContext) -> Result<String, RenderError> {
        let mut out = String::from("<!doctype html><html><head><title>");
        push(&mut out, LAYOUT_ENTRY, format_args!("{}", escape(page.name())))?;
        out.push_str("</title></head><body>");
        if !context.flashes.is_empty() {
            out.push_str(r#"<ul class="flashes">"#);
            for flash in &context.flashes {
                push(&mut out, LAYOUT_ENTRY, format_args!("<li>{}</li>", escape(flash.message())))?;
            }
            out.push_str("</ul>");
        }
        for template in page.nested() {
            render_nested(&mut out, template, context)?;
        }
        out.push_str("</body></html>");
        Ok(out)
    }
}

fn render_nested(
    out: &mut String,
    template: &str,
    context: &RenderContext,
) -> Result<(), RenderError> {
    match template {
        "user" => {
            let user = required_user(template, context.user.as_ref(), "user")?;
            let role = if user.is_admin { " (admin)" } else { "" };
            push(
                out,
                template,
                format_args!(r#"<p class="user">logged in as {}{role}</p>"#, escape(&user.name)),
            )
        }
        "pages/login" => {
            out.push_str(concat!(
                r#"<form method="post" action="/admin/login_do">"#,
                r#"<input type="text" name="username"><input type="password" name="password">"#,
                r#"<button type="submit">login</button></form>"#,
            ));
            Ok(())
        }
        "pages/home" => {
            push(
                out,
                template,
                format_args!(
                    "<p>{} artists, {} albums, {} tracks</p><ul>",
                    context.artist_count, context.album_count, context.track_count
                ),
            )?;
            for user in &context.all_users {
                push(out, template, format_args!("<li>{}</li>", escape(&user.name)))?;
            }
            out.push_str("</ul>");
            Ok(())
        }
        "pages/create_user" => {
            out.push_str(concat!(
                r#"<form method="post" action="/admin/create_user_do">"#,
                r#"<input type="text" name="username"><input type="password" name="password">"#,
                r#"<button type="submit">create</button></form>"#,
            ));
            Ok(())
        }
        "pages/change_password" => {
            let selected =
                required_user(template, context.selected_user.as_ref(), "selected_user")?;
            push(
                out,
                template,
                format_args!(
                    concat!(
                        r#"<form method="post" action="/admin/change_password_do?user={}">"#,
                        r#"<input type="password" name="password">"#,
                        r#"<button type="submit">change</button></form>"#,
                    ),
                    selected.id
                ),
            )
        }
        other => Err(RenderError::new(other, "no such template")),
    }
}

fn required_user<'a>(
    template: &str,
    user: Option<&'a User>,
    field: &str,
) -> Result<&'a User, RenderError> {
    user.ok_or_else(|| RenderError::new(template, format!("missing field `{field}`")))
}

fn push(
    out: &mut String,
    template: &str,
    args: std::fmt::Arguments<'_>,
) -> Result<(), RenderError> {
    out.write_fmt(args)
        .map_err(|error| RenderError::new(template, error.to_string()))
}
