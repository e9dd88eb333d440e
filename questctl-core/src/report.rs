//! Report assembly: ordered award lines, independent of destination
//! markup. A thin markdown decorator for the chat surface lives at the
//! bottom.

use std::collections::BTreeSet;

use crate::awards::{self, AwardResult};
use crate::classify::ActionRecord;
use crate::time::format_elapsed;
use crate::window::QuestWindow;

/// Assemble the report as plain lines in the documented order: title,
/// separator, elapsed time, participant count, the damage/item awards,
/// separator, the spell awards. Categories without qualifying data
/// contribute no line. Deterministic for a given record set.
pub fn format_report(window: &QuestWindow, records: &[ActionRecord], header: &str) -> Vec<String> {
    let mut lines = Vec::new();

    match window.quest_name() {
        Some(name) => lines.push(format!("{}: {}", header, name)),
        None => lines.push(header.to_string()),
    }
    lines.push(String::new());

    if let (Some(first), Some(last)) = (
        records.iter().map(|r| r.timestamp).min(),
        records.iter().map(|r| r.timestamp).max(),
    ) {
        lines.push(format!("Quest lasted {}.", format_elapsed(last - first)));
        let participants: BTreeSet<&str> = records.iter().map(|r| r.user.as_str()).collect();
        lines.push(format!("{} participants", participants.len()));
    }

    let battle: Vec<String> = [
        awards::most_brutal(records),
        awards::first_hit(records),
        awards::hardest_hit(records),
        awards::stop_hitting_yourself(records),
        awards::shiny_hoarder(records),
    ]
    .into_iter()
    .flatten()
    .map(|a| award_line(&a))
    .collect();

    let mut spells: Vec<String> = awards::CAST_AWARDS
        .iter()
        .filter_map(|(title, spell)| awards::most_casts_of(records, title, spell))
        .map(|a| award_line(&a))
        .collect();
    if let Some(supportive) = awards::most_supportive(records) {
        spells.push(award_line(&supportive));
    }

    lines.extend(battle.iter().cloned());
    if !battle.is_empty() && !spells.is_empty() {
        lines.push(String::new());
    }
    lines.extend(spells);

    lines
}

/// "Most Brutal: Alice with 30 total damage" or, tied,
/// "Most Brutal: Tie! Alice and Bob with 30 total damage each".
fn award_line(award: &AwardResult) -> String {
    let names = join_names(&award.winners);
    let count = format_count(award.count);
    if award.is_tie() {
        format!(
            "{}: Tie! {} with {} {} each",
            award.title, names, count, award.label
        )
    } else {
        format!("{}: {} with {} {}", award.title, names, count, award.label)
    }
}

fn join_names(names: &BTreeSet<String>) -> String {
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    match names.len() {
        0 => String::new(),
        1 => names[0].to_string(),
        _ => format!(
            "{} and {}",
            names[..names.len() - 1].join(", "),
            names[names.len() - 1]
        ),
    }
}

/// Whole counts render without a decimal point, fractional damage keeps it.
fn format_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{}", count as i64)
    } else {
        format!("{}", count)
    }
}

/// Decorate plain report lines for the chat surface: bold title, real
/// newlines between lines.
pub fn to_chat_markdown(lines: &[String]) -> String {
    let mut out = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if idx == 0 && !line.is_empty() {
            out.push(format!("**{}**", line));
        } else {
            out.push(line.clone());
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use crate::classify::classify_all;
    use crate::window::extract_window;

    fn scenario_transcript() -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(
                "You defeated the Dragon! The quest, Dragon Hunt, has ended. You all receive the rewards.",
                1300,
            ),
            ChatMessage::system("`Bob` casts Blessing on the party.", 1200),
            ChatMessage::system(
                "`Alice` attacks Dragon for 10 damage and the party takes 2 damage.",
                1100,
            ),
            ChatMessage::system("Fighting alongside Knight Fiona, your Quest, Dragon Hunt, has Started!", 1000),
        ]
    }

    #[test]
    fn test_scenario_report() {
        let window = extract_window(&scenario_transcript(), 1).unwrap();
        assert_eq!(window.messages.len(), 4);
        let records = classify_all(&window.messages);
        assert_eq!(records.len(), 2);

        let lines = format_report(&window, &records, "Quest Report");
        assert_eq!(lines[0], "Quest Report: Dragon Hunt");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Quest lasted 0 minutes.");
        assert_eq!(lines[3], "2 participants");
        assert!(lines.contains(&"Most Brutal: Alice with 10 total damage".to_string()));
        assert!(lines.contains(&"Most Healing: Bob with 1 casts".to_string()));
        // no item line, no refreshing line, etc.
        assert!(!lines.iter().any(|l| l.starts_with("Shiny Hoarder")));
        assert!(!lines.iter().any(|l| l.starts_with("Most Refreshing")));
    }

    #[test]
    fn test_tie_rendering() {
        let transcript = vec![
            ChatMessage::system("Done! The quest, Rat Patrol, has ended. You all receive the rewards.", 400),
            ChatMessage::system("`Bob` attacks Rat for 10 damage.", 300),
            ChatMessage::system("`Alice` attacks Rat for 10 damage.", 200),
            ChatMessage::system("Your Quest, Rat Patrol, has Started!", 100),
        ];
        let window = extract_window(&transcript, 1).unwrap();
        let records = classify_all(&window.messages);
        let lines = format_report(&window, &records, "Quest Report");
        assert!(lines
            .contains(&"Most Brutal: Tie! Alice and Bob with 10 total damage each".to_string()));
    }

    #[test]
    fn test_report_is_deterministic() {
        let window = extract_window(&scenario_transcript(), 1).unwrap();
        let records = classify_all(&window.messages);
        let a = format_report(&window, &records, "Quest Report");
        let b = format_report(&window, &records, "Quest Report");
        assert_eq!(a, b);
    }

    #[test]
    fn test_separator_between_award_groups() {
        let window = extract_window(&scenario_transcript(), 1).unwrap();
        let records = classify_all(&window.messages);
        let lines = format_report(&window, &records, "Quest Report");
        let brutal = lines.iter().position(|l| l.starts_with("Most Brutal")).unwrap();
        let healing = lines.iter().position(|l| l.starts_with("Most Healing")).unwrap();
        // blank line between the battle group and the spell group
        assert!(lines[brutal + 1..healing].contains(&String::new()));
    }

    #[test]
    fn test_markdown_decoration() {
        let lines = vec!["Quest Report: Dragon Hunt".to_string(), String::new(), "x".to_string()];
        let md = to_chat_markdown(&lines);
        assert!(md.starts_with("**Quest Report: Dragon Hunt**\n"));
        assert!(md.ends_with("\nx"));
    }

    #[test]
    fn test_three_way_tie_name_join() {
        let names: BTreeSet<String> =
            ["Alice", "Bob", "Cara"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_names(&names), "Alice, Bob and Cara");
    }
}
