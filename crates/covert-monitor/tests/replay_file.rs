//! Script files replayed end to end.

use covert_core::types::SecurityLevel;
use covert_core::parse_script;
use covert_monitor::{replay, ReferenceMonitor};
use std::io::Write;

#[test]
fn replay_script_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# classic two-level exercise").unwrap();
    writeln!(file, "write hal hobj 10").unwrap();
    writeln!(file, "read hal hobj").unwrap();
    writeln!(file, "write lyle lobj 5").unwrap();
    writeln!(file, "read hal lobj").unwrap();
    writeln!(file, "write hal lobj 99").unwrap();
    writeln!(file, "read lyle hobj").unwrap();
    writeln!(file, "WRITE LYLE HOBJ 3").unwrap();
    writeln!(file, "read hal hobj").unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let steps = parse_script(&text);
    assert_eq!(steps.len(), 8);

    let rm = ReferenceMonitor::new();
    rm.register_subject("hal", SecurityLevel::High).unwrap();
    rm.register_subject("lyle", SecurityLevel::Low).unwrap();
    rm.seed_object("lobj", SecurityLevel::Low).unwrap();
    rm.seed_object("hobj", SecurityLevel::High).unwrap();

    let out = replay(&rm, &steps).unwrap();
    let results: Vec<i32> = out.iter().map(|o| o.result).collect();
    assert_eq!(results, vec![10, 10, 5, 5, 0, 0, 3, 3]);

    let last = &out.last().unwrap().state;
    assert_eq!(last.len(), 2);
    assert_eq!((last[0].name.as_str(), last[0].value), ("hobj", 3));
    assert_eq!((last[1].name.as_str(), last[1].value), ("lobj", 5));
}
