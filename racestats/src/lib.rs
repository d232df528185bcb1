pub mod core {
    pub mod classifier;
    pub mod entrant;
    pub mod entrant_store;
    pub mod errors;
    pub mod handle_session;
    pub mod positions;
    pub mod ranking;
    pub mod session;
}

pub mod interfaces {
    pub mod events;
    pub mod records;
}

pub mod post {
    pub mod assemble;
    pub mod report;
    pub mod write_report;
}

pub mod pre {
    pub mod check_opts_pars;
    pub mod read_records;
    pub mod read_session_pars;
    pub mod report_opts;
}





#[cfg(test)]
mod ranking_tests {
    use crate::core::entrant::{EntrantState, FlagKind, PenaltyKind, PitData};
    use crate::core::ranking::{Ranking, Standing};
    use crate::test_utils::entrant_with_laps;

    fn record_flags(entrant: &mut EntrantState, flags: &[FlagKind]) {
        for &flag in flags.iter() {
            entrant.record_flag(flag);
        }
    }

    fn record_penalties(entrant: &mut EntrantState, no_penalties: u32) {
        for _ in 0..no_penalties {
            entrant.update_penalty(PenaltyKind::None, PenaltyKind::DriveThrough, "speeding");
        }
    }

    fn entrants() -> Vec<EntrantState> {
        // final sectors are the lap times, the first two sectors come from the running lap
        let mut a = entrant_with_laps("a", &[62_000, 60_000, 61_000]);
        a.update_split(1, 20_000, 203_000).unwrap();
        a.update_split(2, 41_000, 224_000).unwrap();
        a.update_speed_sample(280.0);
        record_flags(&mut a, &[FlagKind::BlueOn, FlagKind::Contact]);
        record_penalties(&mut a, 2);

        let mut b = entrant_with_laps("b", &[61_000, 60_500, 60_600]);
        b.update_split(1, 19_500, 201_600).unwrap();
        b.update_split(2, 42_000, 224_100).unwrap();
        b.update_speed_sample(290.0);
        b.begin_pit_stop(PitData::default());
        b.complete_pit_stop(30_000);
        record_flags(
            &mut b,
            &[FlagKind::YellowOn, FlagKind::Contact, FlagKind::Contact, FlagKind::Contact],
        );

        let mut c = entrant_with_laps("c", &[63_000, 59_000, 64_000]);
        c.update_split(1, 21_000, 207_000).unwrap();
        c.update_split(2, 40_000, 226_000).unwrap();
        c.begin_pit_stop(PitData::default());
        c.complete_pit_stop(20_000);
        record_flags(
            &mut c,
            &[FlagKind::YellowOn, FlagKind::YellowOff, FlagKind::YellowOn, FlagKind::OffTrack],
        );
        record_penalties(&mut c, 1);

        let mut d = entrant_with_laps("d", &[]);
        record_flags(
            &mut d,
            &[
                FlagKind::Contact,
                FlagKind::Contact,
                FlagKind::OffTrack,
                FlagKind::OffTrack,
                FlagKind::OffTrack,
            ],
        );

        vec![a, b, c, d]
    }

    fn standings(entrants: &[EntrantState]) -> Vec<Standing> {
        entrants
            .iter()
            .enumerate()
            .map(|(i, entrant)| Standing {
                entrant,
                result_pos: i as u32 + 1,
                grid_pos: 4 - i as u32,
                laps_led: if i == 1 { 2 } else { 0 },
                consistency: helpers::general::std_dev(&entrant.laptimes()),
            })
            .collect()
    }

    fn sorted_names(ranking: Ranking, standings: &[Standing]) -> Vec<String> {
        let mut tmp_standings = standings.to_owned();
        ranking.sort(&mut tmp_standings);
        tmp_standings
            .iter()
            .map(|s| s.entrant.user_name().to_owned())
            .collect()
    }

    #[test]
    fn test_best_lap_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::BestLap, &standings), vec!["c", "a", "b", "d"]);
    }
    #[test]
    fn test_first_lap_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::FirstLap, &standings), vec!["b", "a", "c", "d"]);
    }
    #[test]
    fn test_top_speed_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::TopSpeed, &standings), vec!["b", "a", "c", "d"]);
    }
    #[test]
    fn test_pit_stops_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::PitStops, &standings), vec!["a", "d", "c", "b"]);
    }
    #[test]
    fn test_grid_position_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::GridPosition, &standings), vec!["d", "c", "b", "a"]);
        assert_eq!(
            sorted_names(Ranking::PositionsGained, &standings),
            vec!["a", "b", "c", "d"]
        );
        assert_eq!(Ranking::PositionsGained.value(&standings[0]), Some(String::from("+3")));
    }
    #[test]
    fn test_laps_led_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::LapsLed, &standings), vec!["b", "a", "c", "d"]);
    }
    #[test]
    fn test_incidents_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::BlueFlags, &standings), vec!["a", "b", "c", "d"]);
    }
    #[test]
    fn test_yellow_flags_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::YellowFlags, &standings), vec!["c", "b", "a", "d"]);
    }
    #[test]
    fn test_contacts_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::Contacts, &standings), vec!["b", "d", "a", "c"]);
    }
    #[test]
    fn test_off_tracks_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::OffTracks, &standings), vec!["d", "c", "a", "b"]);
    }
    #[test]
    fn test_penalties_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::Penalties, &standings), vec!["b", "d", "c", "a"]);
    }
    #[test]
    fn test_average_lap_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::AverageLap, &standings), vec!["b", "a", "c", "d"]);
        assert_eq!(Ranking::AverageLap.value(&standings[1]), Some(String::from("1:00.700")));
    }
    #[test]
    fn test_best_sector_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(
            sorted_names(Ranking::BestSector(0), &standings),
            vec!["b", "a", "c", "d"]
        );
        assert_eq!(
            sorted_names(Ranking::BestSector(1), &standings),
            vec!["c", "a", "b", "d"]
        );
        assert_eq!(
            sorted_names(Ranking::BestSector(2), &standings),
            vec!["c", "a", "b", "d"]
        );
        assert_eq!(Ranking::BestSector(1).value(&standings[1]), Some(String::from("22.500")));
        assert_eq!(Ranking::BestSector(0).value(&standings[3]), None);
    }
    #[test]
    fn test_theoretical_best_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(entrants[2].theoretical_best(), Some(21_000 + 19_000 + 59_000));
        assert_eq!(
            sorted_names(Ranking::TheoreticalBest, &standings),
            vec!["c", "a", "b", "d"]
        );
    }
    #[test]
    fn test_consistency_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(sorted_names(Ranking::Consistency, &standings), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn test_determinism_1() {
        // every leaderboard is idempotent and independent of the input order
        let entrants = entrants();
        let standings = standings(&entrants);
        let mut reversed = standings.to_owned();
        reversed.reverse();

        for ranking in Ranking::all(3).into_iter() {
            let once = sorted_names(ranking, &standings);
            assert_eq!(sorted_names(ranking, &reversed), once);

            let mut tmp_standings = standings.to_owned();
            ranking.sort(&mut tmp_standings);
            ranking.sort(&mut tmp_standings);
            let twice: Vec<String> = tmp_standings
                .iter()
                .map(|s| s.entrant.user_name().to_owned())
                .collect();
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_values_1() {
        let entrants = entrants();
        let standings = standings(&entrants);
        assert_eq!(Ranking::BestLap.value(&standings[2]), Some(String::from("59.000")));
        assert_eq!(Ranking::BestLap.value(&standings[3]), None);
        assert_eq!(Ranking::PitStops.value(&standings[1]), Some(String::from("1 (30.000)")));
        assert_eq!(Ranking::BestSector(0).name(), "best_sector_1");
    }
}


#[cfg(test)]
mod assemble_tests {
    use crate::core::entrant::{
        EntrantState, PitData, ResultCode, CONFIRM_DSQ, GRID_SENTINEL, PIT_WORK_REFUEL,
        PIT_WORK_TIRES,
    };
    use crate::core::session::{SessionContext, SessionKind};
    use crate::interfaces::records::{NoRecords, RecordLookup, RecordTable, WorldRecord};
    use crate::post::assemble::{
        assemble_report, pit_stop_reasons, reconstruct_stints, resolve_grid_positions,
        LAPPED_CUTOFF_MS,
    };
    use crate::post::report::{Status, Stint};
    use crate::test_utils::{entrant_with_laps, finished_entrant};

    fn context() -> SessionContext {
        SessionContext::new("Spa", SessionKind::Race)
    }

    fn finished_on_grid(user_name: &str, laptimes: &[u32], grid_position: u32) -> EntrantState {
        let mut entrant = entrant_with_laps(user_name, laptimes);
        entrant.join(1, 1, "GT3", grid_position);
        let total_time = entrant.racetime();
        entrant.finalize(total_time, ResultCode::Finished, "", 0, 0);
        entrant
    }

    fn abc_field() -> Vec<EntrantState> {
        let mut b_laps = vec![60_000; 19];
        b_laps.push(65_000);

        vec![
            finished_entrant("C", &[69_000; 18]),
            finished_entrant("B", &b_laps),
            finished_entrant("A", &[60_000; 20]),
        ]
    }

    #[test]
    fn test_classification_1() {
        let report = assemble_report(&context(), &abc_field(), LAPPED_CUTOFF_MS, &NoRecords);

        let names: Vec<&str> = report.results.iter().map(|r| r.user_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(report.results[0].total_time, 1_200_000);
        assert_eq!(report.results[0].status, Status::Finished);
        assert_eq!(report.results[0].gap, "");
        assert_eq!(report.results[1].total_time, 1_205_000);
        assert_eq!(report.results[1].status, Status::Finished);
        assert_eq!(report.results[1].gap, "+5.000");
        assert_eq!(report.results[2].status, Status::Lapped);
        assert_eq!(report.results[2].gap, "+2 laps");
        assert_eq!(report.results[0].laps_led, 20);
        assert_eq!(report.positions[0].positions(), vec![1; 20]);
        assert_eq!(report.positions[2].user_name, "C");
        assert_eq!(report.positions[2].positions(), vec![3; 18]);
    }
    #[test]
    fn test_classification_2() {
        // a lapped entrant outside of the cutoff is reported as retired
        let report = assemble_report(&context(), &abc_field(), 10_000, &NoRecords);
        assert_eq!(report.results[2].status, Status::Dnf);
        assert_eq!(report.results[2].gap, "DNF");
    }
    #[test]
    fn test_classification_3() {
        // entrants without a completed lap are dropped
        let mut entrants = abc_field();
        entrants.push(EntrantState::new("spectator", 2));
        let report = assemble_report(&context(), &entrants, LAPPED_CUTOFF_MS, &NoRecords);
        assert_eq!(report.results.len(), 3);
        assert!(report.result("spectator").is_none());
        assert_eq!(report.positions.len(), 3);
    }
    #[test]
    fn test_classification_4() {
        let mut dsq = entrant_with_laps("D", &[59_000; 20]);
        dsq.finalize(1_180_000, ResultCode::Finished, "", CONFIRM_DSQ, 0);
        let mut entrants = abc_field();
        entrants.push(dsq);

        let report = assemble_report(&context(), &entrants, LAPPED_CUTOFF_MS, &NoRecords);
        assert_eq!(report.results[3].user_name, "D");
        assert_eq!(report.results[3].status, Status::Dsq);
        assert_eq!(report.results[3].gap, "DSQ");
    }

    #[test]
    fn test_empty_1() {
        let report = assemble_report(&context(), &[], LAPPED_CUTOFF_MS, &NoRecords);
        assert!(report.results.is_empty());
        assert!(report.positions.is_empty());
        assert!(report.world_records.is_empty());
        assert!(report.rankings.iter().all(|board| board.entries.is_empty()));
        assert_eq!(report.session.track_name, "Spa");
    }

    #[test]
    fn test_grid_positions_1() {
        let x = finished_on_grid("X", &[60_000; 3], 1);
        let y = finished_on_grid("Y", &[61_000; 3], 2);
        let z = finished_on_grid("Z", &[59_000; 3], GRID_SENTINEL);

        let report = assemble_report(&context(), &[x, y, z], LAPPED_CUTOFF_MS, &NoRecords);
        assert_eq!(report.result("Z").unwrap().grid_position, 3);
        assert_eq!(report.result("X").unwrap().grid_position, 1);
        assert_eq!(report.result("Y").unwrap().grid_position, 2);

        let board = report.ranking("grid_position").unwrap();
        let names: Vec<&str> = board.entries.iter().map(|e| e.user_name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y", "Z"]);
    }
    #[test]
    fn test_grid_positions_2() {
        // several late joiners are assigned in classification order
        let x = finished_on_grid("X", &[60_000; 3], 1);
        let y = finished_entrant("Y", &[61_000; 3]);
        let z = finished_entrant("Z", &[59_000; 3]);

        let report = assemble_report(&context(), &[x, y, z], LAPPED_CUTOFF_MS, &NoRecords);
        assert_eq!(report.result("Z").unwrap().grid_position, 2);
        assert_eq!(report.result("Y").unwrap().grid_position, 3);
    }

    #[test]
    fn test_grid_positions_3() {
        let x = finished_on_grid("X", &[60_000; 3], u32::MAX);
        let y = finished_on_grid("Y", &[61_000; 3], GRID_SENTINEL);
        let z = finished_on_grid("Z", &[62_000; 3], GRID_SENTINEL);

        assert_eq!(resolve_grid_positions(&[x, y, z]), vec![u32::MAX, u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_pit_stop_1() {
        let mut entrant = entrant_with_laps("A", &[60_000; 2]);
        entrant.begin_pit_stop(PitData {
            work: PIT_WORK_TIRES | PIT_WORK_REFUEL,
        });
        entrant.complete_pit_stop(25_300);

        let report = assemble_report(&context(), &[entrant], LAPPED_CUTOFF_MS, &NoRecords);
        let pit_stop = &report.results[0].pit_stops[0];
        assert_eq!(pit_stop.duration, "25.300");
        assert_eq!(pit_stop.reason, vec!["tires", "refuel"]);
        assert_eq!(pit_stop.lap, 3);
    }
    #[test]
    fn test_pit_stop_2() {
        let mut entrant = EntrantState::new("A", 2);
        entrant.update_lap(60_000, 0, 1, 2, 60_000).unwrap();
        entrant.update_lap(85_000, 1, 2, 2, 145_000).unwrap();
        assert_eq!(entrant.stop_count(), 1);
        entrant.finalize(145_000, ResultCode::Finished, "", 0, 2);

        let report = assemble_report(&context(), &[entrant], LAPPED_CUTOFF_MS, &NoRecords);
        assert_eq!(report.results[0].stop_count, 2);
        assert!(report.results[0].pit_stops.is_empty());
    }
    #[test]
    fn test_pit_stop_reasons_1() {
        assert_eq!(pit_stop_reasons(0x1f), vec!["stop", "damage", "tires", "refuel", "setup"]);
        assert!(pit_stop_reasons(0).is_empty());
    }

    #[test]
    fn test_stints_1() {
        let mut entrant = EntrantState::new("A", 2);

        for lap in 1..=20 {
            if lap == 5 {
                entrant.record_driver_change("A", "B");
            }
            if lap == 12 {
                entrant.record_driver_change("B", "C");
            }
            entrant.update_lap(60_000, 0, lap, 2, lap * 60_000).unwrap();
        }

        assert_eq!(
            reconstruct_stints(&entrant),
            vec![
                Stint { driver: String::from("A"), from_lap: 1, to_lap: 4 },
                Stint { driver: String::from("B"), from_lap: 5, to_lap: 11 },
                Stint { driver: String::from("C"), from_lap: 12, to_lap: 20 },
            ]
        );
    }
    #[test]
    fn test_stints_2() {
        let entrant = entrant_with_laps("A", &[60_000; 7]);
        assert_eq!(
            reconstruct_stints(&entrant),
            vec![Stint { driver: String::from("A"), from_lap: 1, to_lap: 7 }]
        );
    }

    struct FailingRecords;

    impl RecordLookup for FailingRecords {
        fn lookup(&self, _track: &str, _car: &str) -> anyhow::Result<Option<WorldRecord>> {
            anyhow::bail!("record service unavailable")
        }
    }

    #[test]
    fn test_world_records_1() {
        let entrant = finished_on_grid("A", &[60_000; 2], 1);
        assert_eq!(entrant.car_name(), "GT3");
        let report = assemble_report(&context(), &[entrant], LAPPED_CUTOFF_MS, &FailingRecords);
        assert!(report.world_records.is_empty());
        assert_eq!(report.results.len(), 1);
    }
    #[test]
    fn test_world_records_2() {
        let mut a = entrant_with_laps("A", &[60_000; 2]);
        a.join(1, 1, "GT3", 1);
        let mut b = entrant_with_laps("B", &[60_000; 2]);
        b.join(2, 2, "GT3", 2);
        let records = RecordTable::new(vec![
            WorldRecord {
                track: String::from("Spa"),
                car: String::from("GT3"),
                laptime: 137_000,
                holder: String::from("someone"),
            },
            WorldRecord {
                track: String::from("Monza"),
                car: String::from("GT3"),
                laptime: 105_000,
                holder: String::from("someone else"),
            },
        ]);

        let report = assemble_report(&context(), &[a, b], LAPPED_CUTOFF_MS, &records);
        assert_eq!(report.world_records.len(), 1);
        assert_eq!(report.world_records[0].laptime, 137_000);
    }

    #[test]
    fn test_rankings_1() {
        let report = assemble_report(&context(), &abc_field(), LAPPED_CUTOFF_MS, &NoRecords);
        let board = report.ranking("best_lap").unwrap();
        let names: Vec<&str> = board.entries.iter().map(|e| e.user_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(board.entries[0].value, Some(String::from("1:00.000")));
        assert!(report.ranking("best_sector_3").is_some());
        assert!(report.ranking("best_sector_4").is_none());
    }
}
