//! Aggregation model: fold build log entries into per-target durations.

pub mod paths;

use crate::Result;
use crate::log::LogEntry;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Target path -> accumulated build time in seconds.
pub type DurationMap = BTreeMap<String, f64>;

/// Sum step durations per target, merging duplicate targets.
///
/// With a `build_dir`, absolute targets are rewritten relative to it so that
/// `/out/obj/x.o` and `obj/x.o` land on the same key. Stops at the first
/// error yielded by `entries`.
pub fn build_durations<I>(entries: I, build_dir: Option<&Path>) -> Result<DurationMap>
where
    I: IntoIterator<Item = Result<LogEntry>>,
{
    let mut durations = DurationMap::new();
    for entry in entries {
        let entry = entry?;
        let secs = entry.duration_secs();
        let key = target_key(&entry.target, build_dir);
        tracing::trace!(
            path = %key,
            secs,
            restat = entry.restat,
            cmdhash = %entry.cmdhash,
            "build step"
        );

        *durations.entry(key.into_owned()).or_insert(0.0) += secs;
    }
    Ok(durations)
}

/// Aggregation key for a target. Ninja logs should only name paths inside
/// the build directory, but absolute ones show up in practice.
pub fn target_key<'a>(target: &'a str, build_dir: Option<&Path>) -> Cow<'a, str> {
    match build_dir {
        Some(dir) if Path::new(target).has_root() => {
            let rel = paths::relative_to(Path::new(target), dir);
            Cow::Owned(rel.to_string_lossy().into_owned())
        }
        _ => Cow::Borrowed(target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn entry(start: i64, end: i64, target: &str) -> Result<LogEntry> {
        Ok(LogEntry {
            start,
            end,
            restat: 0,
            target: target.to_string(),
            cmdhash: "0123abcd".to_string(),
        })
    }

    #[test]
    fn merges_duplicate_targets() {
        let map = build_durations(
            vec![entry(0, 500, "foo.o"), entry(500, 1500, "foo.o"), entry(0, 250, "bar.o")],
            None,
        )
        .unwrap();

        assert_eq!(
            map,
            DurationMap::from([("bar.o".to_string(), 0.25), ("foo.o".to_string(), 1.5)])
        );
    }

    #[test]
    fn rewrites_absolute_targets_under_build_dir() {
        let map = build_durations(
            vec![entry(0, 1000, "/a/b/out.o"), entry(0, 1000, "out.o")],
            Some(Path::new("/a/b")),
        )
        .unwrap();

        assert_eq!(map, DurationMap::from([("out.o".to_string(), 2.0)]));
    }

    #[test]
    fn keeps_absolute_targets_without_build_dir() {
        let map = build_durations(vec![entry(0, 1000, "/a/b/out.o")], None).unwrap();

        assert_eq!(map, DurationMap::from([("/a/b/out.o".to_string(), 1.0)]));
    }

    #[test]
    fn relative_targets_pass_through() {
        assert_eq!(target_key("obj/x.o", Some(Path::new("/a/b"))), "obj/x.o");
        assert_eq!(target_key("obj/x.o", None), "obj/x.o");
        assert_eq!(target_key("/a/b/obj/x.o", Some(Path::new("/a/b"))), "obj/x.o");
    }

    #[test]
    fn restat_and_cmdhash_do_not_split_keys() {
        let entries = vec![
            Ok(LogEntry {
                start: 0,
                end: 100,
                restat: 1,
                target: "x.o".to_string(),
                cmdhash: "aaaa".to_string(),
            }),
            Ok(LogEntry {
                start: 100,
                end: 300,
                restat: 0,
                target: "x.o".to_string(),
                cmdhash: "bbbb".to_string(),
            }),
        ];
        let map = build_durations(entries, None).unwrap();

        assert_eq!(map.len(), 1);
        assert!((map["x.o"] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn propagates_first_error() {
        let entries = vec![
            entry(0, 1, "a.o"),
            Err(anyhow::anyhow!("bad record")),
            entry(0, 1, "b.o"),
        ];

        let err = build_durations(entries, None).unwrap_err();
        assert_eq!(err.to_string(), "bad record");
    }

    fn arb_entries() -> impl Strategy<Value = Vec<(i64, i64, usize)>> {
        prop::collection::vec((0i64..1_000_000, 0i64..100_000, 0usize..5), 0..64)
            .prop_map(|v| v.into_iter().map(|(s, d, t)| (s, s + d, t)).collect::<Vec<_>>())
    }

    fn to_entries(raw: &[(i64, i64, usize)]) -> Vec<Result<LogEntry>> {
        const TARGETS: [&str; 5] = ["a.o", "b.o", "/out/c.o", "obj/d.o", "/out/obj/d.o"];
        raw.iter()
            .map(|&(s, e, t)| entry(s, e, TARGETS[t]))
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_total_duration_is_conserved(raw in arb_entries()) {
            let map = build_durations(to_entries(&raw), Some(Path::new("/out"))).unwrap();

            let expected: f64 = raw.iter().map(|&(s, e, _)| (e - s) as f64 / 1000.0).sum();
            let total: f64 = map.values().sum();
            prop_assert!((total - expected).abs() < 1e-6);
        }

        #[test]
        fn prop_input_order_does_not_matter(raw in arb_entries()) {
            let forward = build_durations(to_entries(&raw), Some(Path::new("/out"))).unwrap();
            let mut reversed_raw = raw.clone();
            reversed_raw.reverse();
            let reversed =
                build_durations(to_entries(&reversed_raw), Some(Path::new("/out"))).unwrap();

            prop_assert_eq!(
                forward.keys().collect::<Vec<_>>(),
                reversed.keys().collect::<Vec<_>>()
            );
            for (target, secs) in &forward {
                prop_assert!((secs - reversed[target]).abs() < 1e-6);
            }
        }
    }
}
