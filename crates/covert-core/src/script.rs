//! Text instruction scripts.
//!
//! One instruction per line: `<command> <subject> <object> [value]`.
//! Case and surrounding whitespace are ignored. Blank lines and lines
//! starting with `#` are skipped. Anything malformed becomes a `BAD`
//! instruction rather than a parse error, so a script always replays.
//!
//! ```text
//! create hal hobj
//! write lyle hobj 7
//! read hal hobj
//! sleep
//! ```

use crate::types::{Command, Instruction};

/// A parsed script line. `subject` is `None` for a bare `sleep` or a line
/// too short to name one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    /// 1-based line number in the source text.
    pub line: usize,
    pub subject: Option<String>,
    pub instruction: Instruction,
}

/// Parses every non-blank, non-comment line of `text`.
pub fn parse_script(text: &str) -> Vec<ScriptStep> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            parse_step(line).map(|(subject, instruction)| ScriptStep {
                line: idx + 1,
                subject,
                instruction,
            })
        })
        .collect()
}

/// Parses a single line. Returns `None` for blank lines and comments.
pub fn parse_step(line: &str) -> Option<(Option<String>, Instruction)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let tokens: Vec<String> = line.split_whitespace().map(str::to_lowercase).collect();
    let subject = tokens.get(1).cloned();

    let instruction = match (Command::from_keyword(&tokens[0]), tokens.len()) {
        (Command::Sleep, 1) | (Command::Sleep, 2) => Instruction::sleep(),
        (cmd @ (Command::Read | Command::Create | Command::Destroy), 3) => {
            Instruction::new(cmd, &tokens[2], 0)
        }
        (Command::Write, 4) => match tokens[3].parse::<i32>() {
            Ok(value) => Instruction::write(&tokens[2], value),
            Err(_) => Instruction::bad(),
        },
        _ => Instruction::bad(),
    };

    Some((subject, instruction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_well_formed_lines() {
        let (subject, instr) = parse_step("  WRITE Lyle HObj 12 ").unwrap();
        assert_eq!(subject.as_deref(), Some("lyle"));
        assert_eq!(instr, Instruction::write("hobj", 12));

        let (subject, instr) = parse_step("read hal lobj").unwrap();
        assert_eq!(subject.as_deref(), Some("hal"));
        assert_eq!(instr, Instruction::read("lobj"));

        let (_, instr) = parse_step("destroy hal obj").unwrap();
        assert_eq!(instr.command(), Command::Destroy);
    }

    #[test]
    fn sleep_takes_optional_subject() {
        assert_eq!(parse_step("sleep").unwrap(), (None, Instruction::sleep()));
        assert_eq!(
            parse_step("sleep hal").unwrap(),
            (Some("hal".to_string()), Instruction::sleep())
        );
    }

    #[test]
    fn malformed_lines_are_bad() {
        for line in [
            "read hal",
            "write hal obj",
            "write hal obj seven",
            "write hal obj 1 2",
            "create hal obj extra",
            "sleep hal now",
            "launch hal obj",
        ] {
            let (_, instr) = parse_step(line).unwrap();
            assert_eq!(instr.command(), Command::Bad, "line: {line}");
        }
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let steps = parse_script("# setup\n\ncreate hal obj\n   \nread lyle obj\n");
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].line, 3);
        assert_eq!(steps[1].line, 5);
        assert_eq!(steps[1].instruction, Instruction::read("obj"));
    }

    proptest! {
        #[test]
        fn any_line_parses_without_panicking(line in "\\PC{0,40}") {
            prop_assert!(parse_script(&line).len() <= 1);
        }
    }
}
