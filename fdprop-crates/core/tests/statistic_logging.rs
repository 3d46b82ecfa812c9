#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024
//! Statistic logging is configured once per process, so this file holds a single test.

use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use fdprop_core::constraints;
use fdprop_core::statistics::configure_statistic_logging;
use fdprop_core::PropagationStrength;
use fdprop_core::Store;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        let bytes = self.0.lock().expect("not poisoned").clone();
        String::from_utf8(bytes).expect("statistics are valid utf-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("not poisoned").write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn store_statistics_are_written_to_the_configured_writer() {
    let _ = env_logger::builder().is_test(true).try_init();

    let buffer = SharedBuffer::default();
    configure_statistic_logging("%%", Some("%% end"), None, Some(Box::new(buffer.clone())));

    let mut store = Store::default();
    let x = store.new_interval_variable(1, 3);
    let y = store.new_interval_variable(1, 3);
    let z = store.new_interval_variable(1, 3);
    let _ = store
        .post(
            constraints::all_different(vec![x, y, z]),
            PropagationStrength::Strong,
        )
        .expect("no failure");

    store.log_statistics();

    let output = buffer.contents();
    let lines: Vec<&str> = output.lines().collect();

    assert!(lines.contains(&"%% variables=3"), "{output}");
    assert!(lines.contains(&"%% constraints=3"), "{output}");
    assert!(
        lines.contains(&"%% store_num_constraints_posted=3"),
        "{output}"
    );
    assert!(
        lines
            .iter()
            .any(|line| line.starts_with("%% AllDifferentMatching_number_2_num_calls=")),
        "{output}"
    );
    assert_eq!(Some(&"%% end"), lines.last());
}
