use crate::cli::{Session, report_api_error, search::require_login, views};

pub async fn me(session: &Session) {
    require_login(session);

    match session.client.current_user().await {
        Ok(user) => println!("{}", views::render_user(&user)),
        Err(e) => {
            report_api_error(&e);
        }
    }
}
