//! Notification body template.

const HEADER: &str = "管理画面よりコンテンツ登録が行われましたのでお知らせいたします。";
const SECTION_LABEL: &str = "<登録内容>";

/// Renders the notification body for a log message. The message is inserted verbatim.
pub fn render_notification(message: &str) -> String {
    format!("{HEADER}\n\n{SECTION_LABEL}\n{message}")
}
