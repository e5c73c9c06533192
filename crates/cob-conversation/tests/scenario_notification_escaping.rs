//! Scenario: user input is escaped in the group notification; the template
//! markup is not.

use cob_conversation::{render_order_notification, OrderConversation, Reaction, SessionStore};
use cob_schemas::{ChatId, Command, ConversationKey, InboundEvent, Markup, UserId};

fn complete_order(markup: Markup, name: &str, phone: &str, comment: &str) -> String {
    let c = OrderConversation::new(ChatId(-1), markup);
    let mut store = SessionStore::new();
    let key = ConversationKey::new(ChatId(10), UserId(10));

    c.handle(&mut store, &InboundEvent::command(key, Command::Start));
    c.handle(&mut store, &InboundEvent::text(key, name));
    c.handle(&mut store, &InboundEvent::text(key, phone));
    match c.handle(&mut store, &InboundEvent::text(key, comment)) {
        Reaction::Submit(sub) => {
            assert_eq!(sub.notification.markup, markup);
            sub.notification.text
        }
        other => panic!("expected submission, got {other:?}"),
    }
}

#[test]
fn script_tag_name_is_html_escaped() {
    let text = complete_order(Markup::Html, "<script>", "+992900000000", "-");
    assert!(text.contains("&lt;script&gt;"));
    assert!(!text.contains("<script>"));
    assert!(text.contains("<b>Комментарий:</b> -"));
}

#[test]
fn html_comment_with_markup_is_neutralised() {
    let text = complete_order(
        Markup::Html,
        "Ann",
        "+992900000000",
        "<b>FREE</b> & urgent",
    );
    assert!(text.contains("&lt;b&gt;FREE&lt;/b&gt; &amp; urgent"));
    // Exactly the four template bold tags remain.
    assert_eq!(text.matches("<b>").count(), 4);
}

#[test]
fn markdown_variant_escapes_reserved_characters() {
    let text = complete_order(Markup::MarkdownV2, "_Ann_", "+992 (900) 000-000", "1.5kg!");
    assert!(text.contains("\\_Ann\\_"));
    assert!(text.contains("\\+992 \\(900\\) 000\\-000"));
    assert!(text.contains("1\\.5kg\\!"));
}

#[test]
fn render_is_pure_and_deterministic() {
    let a = render_order_notification("Ann", "+992900000000", "chocolate", Markup::Html);
    let b = render_order_notification("Ann", "+992900000000", "chocolate", Markup::Html);
    assert_eq!(a, b);
}
