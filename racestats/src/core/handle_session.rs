use crate::core::entrant::PitTransition;
use crate::core::entrant_store::EntrantStore;
use crate::core::errors::FeedError;
use crate::core::session::{Overtake, SessionContext};
use crate::interfaces::events::SessionEvent;
use crate::pre::read_session_pars::SessionPars;
use anyhow::Context;
use flume::{Receiver, Sender};
use std::fs::OpenOptions;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::thread;

/// SessionRun is the state of a session while its events are processed.
#[derive(Debug, Clone)]
pub struct SessionRun {
    pub context: SessionContext,
    pub store: EntrantStore,
    pub no_events: usize,
}

impl SessionRun {
    pub fn new(session_pars: &SessionPars) -> SessionRun {
        SessionRun {
            context: SessionContext::default(),
            store: EntrantStore::new(session_pars.max_splits),
            no_events: 0,
        }
    }

    /// apply routes a single event to the session context or to the state of the entrant it refers
    /// to. Entrant states are created on the first event that references a new identity.
    pub fn apply(&mut self, event: SessionEvent) -> Result<(), FeedError> {
        self.no_events += 1;

        match event {
            // SESSION ---------------------------------------------------------------------------
            SessionEvent::SessionInfo {
                track_name,
                track_layout,
                session_kind,
                weather,
                host_flags,
                qualify_minutes,
                race_laps,
            } => {
                self.context.track_name = track_name;
                self.context.track_layout = track_layout;
                self.context.session_kind = session_kind;
                self.context.weather = weather;
                self.context.host_flags = host_flags;
                self.context
                    .set_provisional_length(qualify_minutes, race_laps);
            }
            SessionEvent::LengthConfirmed {
                qualify_minutes,
                race_laps,
            } => self.context.set_reliable_length(qualify_minutes, race_laps),
            SessionEvent::Chat { nickname, text } => self.context.add_chat(&nickname, &text),
            SessionEvent::Overtake {
                overtaker,
                overtaken,
                lap,
                gap_ms,
                elapsed_ms,
            } => self.context.add_overtake(Overtake {
                overtaker,
                overtaken,
                lap,
                gap: gap_ms,
                elapsed: elapsed_ms,
            }),

            // ENTRANT ---------------------------------------------------------------------------
            SessionEvent::Join {
                entrant,
                connection_id,
                slot_id,
                car_name,
                grid_position,
            } => {
                if self.store.contains(&entrant) {
                    log::info!(
                        "{} reconnected (slot {}), continuing with the previous state",
                        entrant,
                        slot_id
                    );
                }
                self.store
                    .get_or_create(&entrant)
                    .join(connection_id, slot_id, &car_name, grid_position)
            }
            SessionEvent::Disconnect { entrant } => self.store.get_or_create(&entrant).disconnect(),
            SessionEvent::Split {
                entrant,
                split_index,
                split_time_ms,
                elapsed_ms,
            } => self
                .store
                .get_or_create(&entrant)
                .update_split(split_index, split_time_ms, elapsed_ms)?,
            SessionEvent::Lap {
                entrant,
                lap_time_ms,
                stop_count,
                laps_done,
                final_split_index,
                elapsed_ms,
            } => self.store.get_or_create(&entrant).update_lap(
                lap_time_ms,
                stop_count,
                laps_done,
                final_split_index,
                elapsed_ms,
            )?,
            SessionEvent::Penalty {
                entrant,
                old_penalty,
                new_penalty,
                reason,
            } => self
                .store
                .get_or_create(&entrant)
                .update_penalty(old_penalty, new_penalty, &reason),
            SessionEvent::SpeedSample { entrant, speed } => self
                .store
                .get_or_create(&entrant)
                .update_speed_sample(speed),
            SessionEvent::PitStart { entrant, pit_data } => {
                self.store.get_or_create(&entrant).begin_pit_stop(pit_data)
            }
            SessionEvent::PitComplete {
                entrant,
                duration_ms,
            } => {
                let transition = self
                    .store
                    .get_or_create(&entrant)
                    .complete_pit_stop(duration_ms);

                if transition == PitTransition::NoPendingStop {
                    log::warn!(
                        "Ignoring pit stop completion of {} without a pending pit stop",
                        entrant
                    );
                }
            }
            SessionEvent::DriverChange {
                entrant,
                old_identity,
                new_identity,
            } => {
                self.store
                    .get_or_create(&entrant)
                    .record_driver_change(&old_identity, &new_identity);

                if !self.store.add_alias(&new_identity, &entrant) {
                    log::warn!(
                        "{} already belongs to another entrant, driver change of {} is only \
                        recorded",
                        new_identity,
                        entrant
                    );
                }
            }
            SessionEvent::Result {
                entrant,
                total_time_ms,
                result_code,
                car_name,
                confirmation_flags,
                stop_count,
            } => self.store.get_or_create(&entrant).finalize(
                total_time_ms,
                result_code,
                &car_name,
                confirmation_flags,
                stop_count,
            ),
            SessionEvent::Flag { entrant, flag } => {
                self.store.get_or_create(&entrant).record_flag(flag)
            }
            SessionEvent::Assists { entrant, mask } => {
                self.store.get_or_create(&entrant).record_assists(mask)
            }
        }

        Ok(())
    }
}

/// handle_session processes the events of a single session until the feed is closed, and returns
/// the final session state for post-processing. Events are applied strictly in the order in which
/// they are received.
pub fn handle_session(
    session_pars: &SessionPars,
    rx: &Receiver<SessionEvent>,
) -> anyhow::Result<SessionRun> {
    let mut session_run = SessionRun::new(session_pars);

    for event in rx.iter() {
        let no_event = session_run.no_events + 1;
        let entrant = event.entrant().unwrap_or("session").to_owned();

        session_run.apply(event).context(format!(
            "Failed to apply event {} ({}) of the session feed!",
            no_event, entrant
        ))?;
    }

    log::debug!(
        "Session feed closed after {} events ({} entrants, {} still connected)",
        session_run.no_events,
        session_run.store.len(),
        session_run
            .store
            .iter()
            .filter(|entrant| entrant.is_connected())
            .count()
    );

    Ok(session_run)
}

/// read_events decodes a JSON event log (a sequence of JSON objects, e.g. one per line) and sends
/// the events to the session handling. It returns the number of events sent.
pub fn read_events(filepath: &Path, tx: &Sender<SessionEvent>) -> anyhow::Result<usize> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open event log {}!", filepath.display()))?;

    let mut no_events = 0;

    for event in serde_json::Deserializer::from_reader(BufReader::new(fh)).into_iter::<SessionEvent>()
    {
        let event = event.context(format!(
            "Failed to parse event {} of event log {}!",
            no_events + 1,
            filepath.display()
        ))?;

        // the receiver only disappears if the session handling failed, which is reported there
        if tx.send(event).is_err() {
            break;
        }
        no_events += 1;
    }

    Ok(no_events)
}

/// handle_session_file reads the event log in a separate thread and processes the events in the
/// calling thread. The session state is returned after the reader finished.
pub fn handle_session_file(
    session_pars: &SessionPars,
    filepath: &Path,
) -> anyhow::Result<SessionRun> {
    // create channel for communication between event reader and session handling
    let (tx, rx) = flume::unbounded();
    let filepath_thread: PathBuf = filepath.to_owned();

    let reader = thread::spawn(move || read_events(filepath_thread.as_path(), &tx));

    let session_run = handle_session(session_pars, &rx);

    // drop the receiver such that a still running reader stops sending
    drop(rx);

    let no_events = match reader.join() {
        Ok(res) => res?,
        Err(_) => anyhow::bail!("Event reader thread of {} panicked!", filepath.display()),
    };
    let session_run = session_run?;

    log::info!(
        "Processed {} events of {} ({} entrants)",
        no_events,
        filepath.display(),
        session_run.store.len()
    );

    Ok(session_run)
}
