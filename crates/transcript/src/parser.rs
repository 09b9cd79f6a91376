//! Total best-effort parse of transcript markdown into a [`Conversation`].
//!
//! Parsing never fails: malformed front matter falls back to "no model
//! recorded, whole text is body" and any line that is not an exact role
//! marker is ordinary content.

use crate::turn::{Conversation, Role, Turn};

/// Parses raw transcript text into a conversation.
#[must_use]
pub fn parse(raw: &str) -> Conversation {
    let lines: Vec<&str> = raw.lines().collect();
    let (model, body) = split_front_matter(&lines);

    let mut conversation = Conversation::with_model(model);
    let mut current_role: Option<Role> = None;
    let mut content = String::new();

    for line in body {
        match Role::from_marker(line) {
            // A marker repeating the open turn's role is a duplicate heading:
            // its text is discarded and the turn keeps accumulating.
            Some(role) if current_role == Some(role) => {}
            Some(role) => {
                close_turn(&mut conversation, current_role, &content);
                current_role = Some(role);
                content.clear();
            }
            None => {
                content.push_str(line);
                content.push('\n');
            }
        }
    }
    close_turn(&mut conversation, current_role, &content);

    conversation
}

fn close_turn(conversation: &mut Conversation, role: Option<Role>, content: &str) {
    let Some(role) = role else {
        return;
    };
    if let Some(turn) = Turn::new(role, content) {
        conversation.push(turn);
    }
}

/// Splits off a leading `---` delimited front-matter block and decodes the
/// `model` key (last occurrence wins). With fewer than two delimiter lines
/// the entire text is the body.
fn split_front_matter<'a>(lines: &'a [&'a str]) -> (Option<String>, &'a [&'a str]) {
    if lines.first() != Some(&"---") {
        return (None, lines);
    }
    let Some(end) = lines.iter().skip(1).position(|line| *line == "---") else {
        return (None, lines);
    };
    let end = end + 1;

    let mut model = None;
    for line in &lines[1..end] {
        if let Some(value) = line.strip_prefix("model:") {
            model = Some(value.trim().to_string());
        }
    }

    (model, &lines[end + 1..])
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::turn::Role;

    #[test]
    fn front_matter_isolation() {
        let conversation = parse("---\nmodel: gpt-x\n---\n\n# User\n\nhi");

        assert_eq!(conversation.model(), Some("gpt-x"));
        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.turns()[0].role, Role::User);
        assert_eq!(conversation.turns()[0].content, "hi");
    }

    #[test]
    fn front_matter_last_model_wins_and_unknown_keys_are_ignored() {
        let conversation = parse("---\ntitle: notes\nmodel: first\nmodel: second\n---\n\n# User\n\nhi");

        assert_eq!(conversation.model(), Some("second"));
        assert_eq!(conversation.turns().len(), 1);
    }

    #[test]
    fn unterminated_front_matter_is_body() {
        let conversation = parse("---\nmodel: gpt-x\n\n# User\n\nhi");

        assert_eq!(conversation.model(), None);
        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.turns()[0].content, "hi");
    }

    #[test]
    fn duplicate_heading_collapse() {
        let conversation = parse("# User\n\nfirst block\n\n# User\n\nsecond block\n");

        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.turns()[0].role, Role::User);
        assert_eq!(conversation.turns()[0].content, "first block\n\n\nsecond block");
    }

    #[test]
    fn empty_turn_discard() {
        let conversation = parse("# User\n# Assistant\n\nreply\n");

        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.turns()[0].role, Role::Assistant);
        assert_eq!(conversation.turns()[0].content, "reply");
    }

    #[test]
    fn content_before_first_marker_is_dropped() {
        let conversation = parse("preamble text\n\n# User\n\nhi\n");

        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.turns()[0].content, "hi");
    }

    #[test]
    fn non_role_headings_stay_in_content() {
        let input = "---\nmodel: etst\n---\n\n# User\n\n# your text here\n\nstuff\n\n\
# More text here\n\nstuff2\n\n# Assistant\n\nworks\n\n# User\n\n# User\n\n# User\n\ngg\n\n\
# Assistant\n\nasd\n\n# Assistant\n\nggz";
        let conversation = parse(input);

        assert_eq!(conversation.model(), Some("etst"));
        let turns = conversation.turns();
        assert_eq!(turns.len(), 4);

        assert_eq!(turns[0].role, Role::User);
        assert_eq!(
            turns[0].content,
            "# your text here\n\nstuff\n\n# More text here\n\nstuff2"
        );
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "works");
        assert_eq!(turns[2].role, Role::User);
        assert_eq!(turns[2].content, "gg");
        assert_eq!(turns[3].role, Role::Assistant);
        assert_eq!(turns[3].content, "asd\n\n\nggz");
    }

    #[test]
    fn parse_of_streamed_prefix_keeps_earlier_turns_intact() {
        // A heading followed by fragments but no trailing separator is the
        // on-disk shape after a crash mid-stream.
        let conversation = parse("# User\n\nhi\n\n# Assistant\n\npartial rep");

        assert_eq!(conversation.turns().len(), 2);
        assert_eq!(conversation.turns()[0].content, "hi");
        assert_eq!(conversation.turns()[1].role, Role::Assistant);
        assert_eq!(conversation.turns()[1].content, "partial rep");
    }

    #[test]
    fn heading_without_content_at_end_is_discarded() {
        let conversation = parse("# User\n\nhi\n\n# Assistant\n\n");

        assert_eq!(conversation.turns().len(), 1);
        assert_eq!(conversation.turns()[0].content, "hi");
    }

    #[test]
    fn empty_input_is_empty_conversation() {
        let conversation = parse("");
        assert!(conversation.is_empty());
        assert_eq!(conversation.model(), None);
    }
}
