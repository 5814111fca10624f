//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{DefaultRng, Scru128Generator, Scru128Id};

/// Returns the lock handle of process-wide global generator, creating one if none exists.
///
/// The generator is created on the first call to any entry point function and lives until the
/// process exits. On Unix, it is replaced by a fresh instance when the process ID changes.
fn lock_global_gen() -> sync::MutexGuard<'static, GlobalGenInner> {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    G.get_or_init(Default::default)
        .lock()
        .expect("scru128: could not lock global generator")
}

/// Generates a new SCRU128 ID object using the global generator.
///
/// This function guarantees the process-wide monotonic order of IDs generated within the same
/// millisecond. Multiple threads can call it concurrently. On Unix, this function resets the
/// generator when the process ID changes (i.e., upon process forks) to prevent collisions across
/// processes.
///
/// # Examples
///
/// ```rust
/// let x = scru128::scru128();
/// println!("{}", x); // e.g., "036z951mhjikzik2gsl81gr7l"
/// println!("{}", x.to_u128()); // as a 128-bit unsigned integer
/// ```
pub fn scru128() -> Scru128Id {
    lock_global_gen().get_mut().generate()
}

/// Generates a new SCRU128 ID encoded in the 25-digit canonical string representation using the
/// global generator.
///
/// Use this to quickly get a new SCRU128 ID as a string.
///
/// # Examples
///
/// ```rust
/// let x = scru128::scru128_string();
/// println!("{}", x); // e.g., "036z951mhzx67t63mq9xe6q0j"
/// ```
pub fn scru128_string() -> String {
    scru128().into()
}

/// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
#[derive(Debug)]
struct GlobalGenInner {
    #[cfg(unix)]
    pid: u32,
    generator: Scru128Generator<DefaultRng>,
}

impl Default for GlobalGenInner {
    fn default() -> Self {
        Self {
            #[cfg(unix)]
            pid: std::process::id(),
            generator: Scru128Generator::new(),
        }
    }
}

impl GlobalGenInner {
    /// Returns a mutable reference to the inner generator, resetting it on Unix if the process
    /// ID has changed.
    fn get_mut(&mut self) -> &mut Scru128Generator<DefaultRng> {
        #[cfg(unix)]
        if self.pid != std::process::id() {
            *self = Default::default();
        }
        &mut self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::{scru128, scru128_string};
    use crate::Scru128Id;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<String> = (0..N_SAMPLES).map(|_| scru128_string()).collect());

    /// Generates 25-digit canonical string
    #[test]
    fn generates_25_digit_canonical_string() {
        let re = regex::Regex::new(r"^[0-9a-z]{25}$").unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(e));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&String> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1] < samples[i]);
            }
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use std::time;
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = scru128().timestamp() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Encodes unique sortable tuple of timestamp and counters
    #[test]
    fn encodes_unique_sortable_tuple_of_timestamp_and_counters() {
        SAMPLES.with(|samples| {
            let mut prev = samples[0].parse::<Scru128Id>().unwrap();
            for e in &samples[1..] {
                let curr = e.parse::<Scru128Id>().unwrap();
                assert!(
                    (prev.timestamp(), prev.counter_hi(), prev.counter_lo())
                        < (curr.timestamp(), curr.counter_hi(), curr.counter_lo())
                );
                prev = curr;
            }
        });
    }

    /// Sets random bits properly
    #[test]
    fn sets_random_bits_properly() {
        // count '1' of each bit of entropy field
        let bins = SAMPLES.with(|samples| {
            let mut bins = [0u32; 32];
            for e in samples {
                let mut num = e.parse::<Scru128Id>().unwrap().entropy();
                for bin in bins.iter_mut() {
                    *bin += num & 1;
                    num >>= 1;
                }
            }
            bins
        });

        // test if random bits are set to 1 at ~50% probability
        // set margin based on binom dist 99.999% confidence interval
        let margin = 4.417173 * (0.5 * 0.5 / N_SAMPLES as f64).sqrt();
        for (i, e) in bins.iter().enumerate() {
            let p = *e as f64 / N_SAMPLES as f64;
            assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..4 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..10_000 {
                        tx.send(scru128()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert((e.timestamp(), e.counter_hi(), e.counter_lo()));
        }

        assert_eq!(s.len(), 4 * 10_000);
        Ok(())
    }
}
