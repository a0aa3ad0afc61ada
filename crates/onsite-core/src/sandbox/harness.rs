//! The in-child test harness and the fixed test battery.
//!
//! The harness is a self-contained Python script staged into a temp
//! directory and spawned as `python3 -I <harness> <candidate> <mem_bytes>`.
//! It applies resource limits, installs import/open guards restricting the
//! candidate to a safe stdlib subset, loads the candidate, verifies the
//! required interface, runs the battery in fixed order, and prints exactly
//! one sentinel-prefixed JSON report line on stdout.

/// Problem presented by this installation.
pub const PROBLEM_ID: &str = "lru_cache";

/// Class the candidate must define.
pub const REQUIRED_CLASS: &str = "LRUCache";

/// Methods the class must expose (besides the constructor).
pub const REQUIRED_METHODS: &[&str] = &["get", "put"];

/// Number of cases in the battery. Classification thresholds key off this.
pub const TEST_COUNT: u32 = 12;

/// Prefix marking the report line among arbitrary candidate stdout.
pub const REPORT_SENTINEL: &str = "@@ONSITE@@ ";

/// Identifiers of the battery cases, in execution order.
pub const TEST_IDS: &[&str] = &[
    "test_put_then_get",
    "test_missing_key_returns_minus_one",
    "test_update_existing_key",
    "test_eviction_order_simple",
    "test_get_refreshes_recency",
    "test_put_refreshes_recency",
    "test_capacity_one",
    "test_overwrite_does_not_evict",
    "test_eviction_order_complex",
    "test_interleaved_operations",
    "test_repeated_churn",
    "test_large_sequence",
];

/// Source of the harness script.
pub const HARNESS_SOURCE: &str = r#"import json
import sys


def report(payload):
    sys.stdout.write("@@ONSITE@@ " + json.dumps(payload) + "\n")
    sys.stdout.flush()


def install_guards(mem_limit):
    sys.dont_write_bytecode = True

    try:
        import resource
        resource.setrlimit(resource.RLIMIT_AS, (mem_limit, mem_limit))
    except (ImportError, ValueError, OSError):
        pass

    import builtins

    blocked = {
        "socket", "ssl", "subprocess", "ctypes", "multiprocessing",
        "urllib", "http", "ftplib", "smtplib", "shutil", "signal",
    }
    real_import = builtins.__import__

    def guarded_import(name, *args, **kwargs):
        root = name.split(".")[0]
        if root in blocked:
            raise ImportError("module '%s' is not available here" % root)
        return real_import(name, *args, **kwargs)

    real_open = builtins.open

    def guarded_open(file, mode="r", *args, **kwargs):
        if any(flag in str(mode) for flag in ("w", "a", "+", "x")):
            raise PermissionError("write access is not available here")
        return real_open(file, mode, *args, **kwargs)

    builtins.__import__ = guarded_import
    builtins.open = guarded_open

    import os

    def denied(*args, **kwargs):
        raise PermissionError("not available here")

    for name in ("system", "popen", "remove", "unlink", "rmdir", "rename",
                 "replace", "truncate", "mkdir", "makedirs", "removedirs"):
        if hasattr(os, name):
            setattr(os, name, denied)


def load_candidate(path):
    import importlib.util

    spec = importlib.util.spec_from_file_location("candidate", path)
    if spec is None or spec.loader is None:
        raise ImportError("cannot load %s" % path)
    module = importlib.util.module_from_spec(spec)
    spec.loader.exec_module(module)
    return module


def arity_ok(fn, expected):
    import inspect

    try:
        sig = inspect.signature(fn)
    except (TypeError, ValueError):
        return True
    params = list(sig.parameters.values())
    if any(p.kind == p.VAR_POSITIONAL for p in params):
        return True
    positional = [p for p in params
                  if p.kind in (p.POSITIONAL_ONLY, p.POSITIONAL_OR_KEYWORD)]
    required = [p for p in positional if p.default is p.empty]
    return len(required) <= expected <= len(positional)


def main():
    candidate_path = sys.argv[1]
    mem_limit = int(sys.argv[2])

    install_guards(mem_limit)

    try:
        module = load_candidate(candidate_path)
    except BaseException as exc:
        report({"status": "load_failure",
                "message": "%s: %s" % (type(exc).__name__, exc)})
        return

    cls = getattr(module, "LRUCache", None)
    if cls is None or not isinstance(cls, type):
        report({"status": "signature_mismatch", "missing": ["LRUCache"]})
        return

    # Expected arities include self.
    checks = (("__init__", getattr(cls, "__init__", None), 2),
              ("get", getattr(cls, "get", None), 2),
              ("put", getattr(cls, "put", None), 3))
    missing = []
    for name, fn, expected in checks:
        if not callable(fn):
            missing.append(name)
        elif not arity_ok(fn, expected):
            missing.append(name)
    if missing:
        report({"status": "signature_mismatch", "missing": missing})
        return

    cases = []

    def run_case(case_id, fn):
        try:
            fn()
            cases.append({"id": case_id, "passed": True, "error": None})
        except AssertionError:
            cases.append({"id": case_id, "passed": False, "error": None})
        except BaseException as exc:
            cases.append({"id": case_id, "passed": False,
                          "error": "%s: %s" % (type(exc).__name__, exc)})

    def test_put_then_get():
        cache = cls(2)
        cache.put(1, 100)
        assert cache.get(1) == 100

    def test_missing_key_returns_minus_one():
        cache = cls(2)
        assert cache.get(42) == -1

    def test_update_existing_key():
        cache = cls(2)
        cache.put(1, 100)
        cache.put(1, 200)
        assert cache.get(1) == 200

    def test_eviction_order_simple():
        cache = cls(2)
        cache.put(1, 1)
        cache.put(2, 2)
        cache.put(3, 3)
        assert cache.get(1) == -1
        assert cache.get(2) == 2
        assert cache.get(3) == 3

    def test_get_refreshes_recency():
        cache = cls(2)
        cache.put(1, 1)
        cache.put(2, 2)
        assert cache.get(1) == 1
        cache.put(3, 3)
        assert cache.get(2) == -1
        assert cache.get(1) == 1

    def test_put_refreshes_recency():
        cache = cls(2)
        cache.put(1, 1)
        cache.put(2, 2)
        cache.put(1, 10)
        cache.put(3, 3)
        assert cache.get(2) == -1
        assert cache.get(1) == 10
        assert cache.get(3) == 3

    def test_capacity_one():
        cache = cls(1)
        cache.put(1, 1)
        cache.put(2, 2)
        assert cache.get(1) == -1
        assert cache.get(2) == 2

    def test_overwrite_does_not_evict():
        cache = cls(2)
        cache.put(1, 1)
        cache.put(2, 2)
        cache.put(2, 20)
        assert cache.get(1) == 1
        assert cache.get(2) == 20

    def test_eviction_order_complex():
        cache = cls(3)
        cache.put(1, 1)
        cache.put(2, 2)
        cache.put(3, 3)
        assert cache.get(1) == 1
        cache.put(4, 4)
        assert cache.get(2) == -1
        assert cache.get(3) == 3
        cache.put(5, 5)
        assert cache.get(1) == -1
        assert cache.get(4) == 4
        assert cache.get(5) == 5

    def test_interleaved_operations():
        cache = cls(2)
        cache.put(1, 1)
        cache.put(2, 2)
        assert cache.get(1) == 1
        cache.put(3, 3)
        assert cache.get(2) == -1
        cache.put(4, 4)
        assert cache.get(1) == -1
        assert cache.get(3) == 3
        assert cache.get(4) == 4

    def test_repeated_churn():
        cache = cls(2)
        for i in range(1, 11):
            cache.put(i, i * 10)
        assert cache.get(9) == 90
        assert cache.get(10) == 100
        assert cache.get(8) == -1

    def test_large_sequence():
        cache = cls(50)
        for i in range(200):
            cache.put(i, i)
        for i in range(150):
            assert cache.get(i) == -1
        for i in range(150, 200):
            assert cache.get(i) == i

    battery = [
        ("test_put_then_get", test_put_then_get),
        ("test_missing_key_returns_minus_one", test_missing_key_returns_minus_one),
        ("test_update_existing_key", test_update_existing_key),
        ("test_eviction_order_simple", test_eviction_order_simple),
        ("test_get_refreshes_recency", test_get_refreshes_recency),
        ("test_put_refreshes_recency", test_put_refreshes_recency),
        ("test_capacity_one", test_capacity_one),
        ("test_overwrite_does_not_evict", test_overwrite_does_not_evict),
        ("test_eviction_order_complex", test_eviction_order_complex),
        ("test_interleaved_operations", test_interleaved_operations),
        ("test_repeated_churn", test_repeated_churn),
        ("test_large_sequence", test_large_sequence),
    ]

    for case_id, fn in battery:
        run_case(case_id, fn)

    report({"status": "completed", "cases": cases})


if __name__ == "__main__":
    main()
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_size_matches_test_count() {
        assert_eq!(TEST_IDS.len() as u32, TEST_COUNT);
    }

    #[test]
    fn test_harness_mentions_every_case_id() {
        for id in TEST_IDS {
            assert!(HARNESS_SOURCE.contains(id), "harness missing case {id}");
        }
    }

    #[test]
    fn test_harness_prints_sentinel() {
        assert!(HARNESS_SOURCE.contains(REPORT_SENTINEL.trim_end()));
    }

    #[test]
    fn test_required_interface_names_present() {
        assert!(HARNESS_SOURCE.contains(REQUIRED_CLASS));
        for method in REQUIRED_METHODS {
            assert!(HARNESS_SOURCE.contains(method));
        }
    }
}
