//! Baseline files and the known/unknown check.
//!
//! A baseline is a text file with one name per line. Loading it fills a
//! [`KeyValueTable`] that maps every name to a sentinel value; a live name is
//! known only if its lookup returns that sentinel.

use std::io::{self, BufRead, Write};

use chainkv_table::{KeyValueTable, TableResult};
use tracing::debug;

/// Read one name per line, with the `\n` or `\r\n` terminator removed.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the whole read.
pub fn read_names<R: BufRead>(mut reader: R) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(names);
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        names.push(String::from_utf8_lossy(&line).into_owned());
    }
}

/// Write one name per line.
pub fn write_names<W: Write>(mut writer: W, names: &[String]) -> io::Result<()> {
    for name in names {
        writeln!(writer, "{name}")?;
    }
    writer.flush()
}

/// The baseline loaded into a table.
#[derive(Debug)]
pub struct Baseline {
    table: KeyValueTable,
    sentinel: String,
}

impl Baseline {
    /// Insert every name with `sentinel` as its value.
    ///
    /// A `capacity` of zero sizes the table from the number of names.
    pub fn from_names(names: &[String], sentinel: &str, capacity: usize) -> TableResult<Self> {
        let capacity = if capacity == 0 { names.len() } else { capacity };
        let mut table = KeyValueTable::with_capacity(capacity)?;
        for name in names {
            table.insert(name, sentinel)?;
        }
        debug!(
            names = names.len(),
            entries = table.len(),
            capacity = table.capacity(),
            "baseline loaded"
        );
        Ok(Self {
            table,
            sentinel: sentinel.to_string(),
        })
    }

    /// Returns `true` if `name` maps to the sentinel.
    pub fn is_known(&self, name: &str) -> bool {
        self.table.get(name) == Some(self.sentinel.as_str())
    }

    /// Names from `live` that the baseline does not recognize, in input order.
    pub fn unrecognized<'a, I>(&self, live: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a String>,
    {
        live.into_iter()
            .map(String::as_str)
            .filter(|name| !self.is_known(name))
            .collect()
    }

    /// The table holding every baseline name.
    pub fn table(&self) -> &KeyValueTable {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn read_strips_line_endings() {
        let input = "launchd\nsshd\r\nWindowServer";
        let read = read_names(input.as_bytes()).unwrap();
        assert_eq!(read, names(&["launchd", "sshd", "WindowServer"]));
    }

    #[test]
    fn read_keeps_blank_lines() {
        let read = read_names("a\n\nb\n".as_bytes()).unwrap();
        assert_eq!(read, names(&["a", "", "b"]));
    }

    #[test]
    fn read_tolerates_invalid_utf8() {
        let input: &[u8] = b"launchd\nbad\xff\xfename\r\nsshd\n";
        let read = read_names(input).unwrap();
        assert_eq!(read, names(&["launchd", "bad\u{FFFD}\u{FFFD}name", "sshd"]));
    }

    #[test]
    fn invalid_utf8_baseline_still_checks() {
        let baseline_names = read_names(&b"\xffproc\nsshd\n"[..]).unwrap();
        let baseline = Baseline::from_names(&baseline_names, "1", 0).unwrap();
        assert!(baseline.is_known("sshd"));
        assert!(baseline.is_known("\u{FFFD}proc"));
        assert!(!baseline.is_known("proc"));
    }

    #[test]
    fn write_then_read_preserves_order() {
        let mut buf = Vec::new();
        let list = names(&["kernel_task", "launchd", "kernel_task"]);
        write_names(&mut buf, &list).unwrap();
        assert_eq!(buf, b"kernel_task\nlaunchd\nkernel_task\n");
        assert_eq!(read_names(buf.as_slice()).unwrap(), list);
    }

    #[test]
    fn duplicate_baseline_names_collapse() {
        let baseline = Baseline::from_names(&names(&["a", "b", "a"]), "1", 0).unwrap();
        assert_eq!(baseline.table().len(), 2);
    }

    #[test]
    fn empty_baseline_uses_default_capacity() {
        let baseline = Baseline::from_names(&[], "1", 0).unwrap();
        assert_eq!(baseline.table().capacity(), chainkv_table::DEFAULT_CAPACITY);
        assert!(!baseline.is_known("anything"));
    }

    #[test]
    fn reports_names_missing_from_baseline() {
        let baseline = Baseline::from_names(&names(&["launchd", "sshd"]), "1", 0).unwrap();
        let live = names(&["launchd", "miner", "sshd", "miner"]);
        assert_eq!(baseline.unrecognized(&live), vec!["miner", "miner"]);
    }

    #[test]
    fn non_sentinel_value_is_unrecognized() {
        let mut baseline = Baseline::from_names(&names(&["sshd"]), "1", 0).unwrap();
        baseline.table.insert("sshd", "0").unwrap();
        assert!(!baseline.is_known("sshd"));
    }

    #[test]
    fn explicit_capacity_wins() {
        let baseline = Baseline::from_names(&names(&["a"]), "1", 64).unwrap();
        assert_eq!(baseline.table().capacity(), 64);
    }
}
