use std::time::Duration;

use board_tally::config::Settings;
use board_tally::dom::layout;
use board_tally::models::*;
use board_tally::service::{BoardService, ServiceError};

fn snapshot() -> BoardSnapshot {
    BoardSnapshot {
        name: "Sprint".to_string(),
        lists: vec![
            ListSnapshot {
                name: "To do".to_string(),
                cards: vec![
                    CardSnapshot {
                        title: "Fix bug (3)".to_string(),
                        hidden: false,
                    },
                    CardSnapshot {
                        title: "Docs (2) $1$".to_string(),
                        hidden: false,
                    },
                ],
            },
            ListSnapshot {
                name: "Done".to_string(),
                cards: vec![CardSnapshot {
                    title: "Release [5]".to_string(),
                    hidden: false,
                }],
            },
        ],
    }
}

fn setup(settings: Settings) -> BoardService {
    BoardService::new(layout::build_board(&snapshot()), settings)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(150)).await;
}

mod startup {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn runs_the_first_pass_immediately() {
        let service = setup(Settings::default());

        let view = service.view();
        assert_eq!(view.passes, 1);
        assert!(view.last_recomputed_at.is_some());
        assert_eq!(view.lists[0].cards[0].title, "Fix bug");
        assert_eq!(view.totals[&MetricKey::Story], "5");
        assert_eq!(service.totals().points(MetricKey::Post), 5.0);
        assert!(!service.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn own_writes_never_schedule_another_pass() {
        let service = setup(Settings::default());

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(service.view().passes, 1);
    }
}

mod external_edits {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn title_edit_is_applied_after_quiescence() {
        let service = setup(Settings::default());
        let card = service.view().lists[0].cards[0].id;

        service.set_card_title(card, "Fix bug (8)").unwrap();

        assert!(service.is_pending());
        assert_eq!(service.view().lists[0].cards[0].title, "Fix bug (8)");

        settle().await;

        let view = service.view();
        assert_eq!(view.passes, 2);
        assert_eq!(view.lists[0].cards[0].title, "Fix bug");
        assert_eq!(view.lists[0].cards[0].badges[&MetricKey::Story], "8");
        assert_eq!(view.lists[0].totals[&MetricKey::Story], "10");
        assert_eq!(view.totals[&MetricKey::Story], "10");
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_edits_runs_a_single_pass() {
        let service = setup(Settings::default());
        let card = service.view().lists[0].cards[0].id;

        for points in 1..=20 {
            service
                .set_card_title(card, &format!("Fix bug ({})", points))
                .unwrap();
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        settle().await;

        let view = service.view();
        assert_eq!(view.passes, 2);
        assert_eq!(view.lists[0].cards[0].badges[&MetricKey::Story], "20");
    }

    #[tokio::test(start_paused = true)]
    async fn adding_and_removing_cards_updates_totals() {
        let service = setup(Settings::default());
        let list = service.view().lists[1].id;

        let card = service.add_card(list, "Hotfix (13) [?]").unwrap();
        settle().await;
        assert_eq!(service.view().lists[1].totals[&MetricKey::Story], "13");
        assert_eq!(service.view().lists[1].totals[&MetricKey::Post], "5");

        service.remove_card(card).unwrap();
        settle().await;
        assert_eq!(service.view().lists[1].totals[&MetricKey::Story], "0");
        assert_eq!(service.view().passes, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn removed_cards_do_not_grow_the_document() {
        let service = setup(Settings::default());
        let list = service.view().lists[0].id;
        let nodes = service.node_count();

        for round in 0..200 {
            let card = service.add_card(list, &format!("Spike ({}) [1]", round % 5)).unwrap();
            settle().await;
            service.remove_card(card).unwrap();
            settle().await;

            assert_eq!(service.node_count(), nodes, "round {}", round);
        }
        assert_eq!(service.view().lists[0].totals[&MetricKey::Story], "5");
    }

    #[tokio::test(start_paused = true)]
    async fn title_edits_do_not_grow_the_document() {
        let service = setup(Settings::default());
        let card = service.view().lists[0].cards[0].id;
        let nodes = service.node_count();

        for round in 0..200 {
            service
                .set_card_title(card, &format!("Fix bug ({})", round % 5 + 1))
                .unwrap();
            settle().await;

            assert_eq!(service.node_count(), nodes, "round {}", round);
        }
        assert_eq!(service.view().passes, 201);
    }

    #[tokio::test(start_paused = true)]
    async fn hiding_a_card_removes_it_from_totals() {
        let service = setup(Settings::default());
        let card = service.view().lists[0].cards[1].id;

        service.set_card_hidden(card, true).unwrap();
        settle().await;

        let view = service.view();
        assert_eq!(view.lists[0].totals[&MetricKey::Story], "3");
        assert_eq!(view.totals[&MetricKey::Hours], "0");
    }

    #[tokio::test(start_paused = true)]
    async fn new_lists_are_picked_up() {
        let service = setup(Settings::default());

        let list = service.add_list("Blocked").unwrap();
        settle().await;
        service.add_card(list, "Waiting (1)").unwrap();
        settle().await;

        let view = service.view();
        assert_eq!(view.lists.len(), 3);
        assert_eq!(view.lists[2].totals[&MetricKey::Story], "1");
        assert_eq!(view.totals[&MetricKey::Story], "6");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_ids_are_rejected() {
        let service = setup(Settings::default());
        let list = service.view().lists[0].id;

        assert!(matches!(
            service.set_card_title(list, "x"),
            Err(ServiceError::CardNotFound(_))
        ));
        assert!(!service.is_pending());
    }
}

mod picker {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn inserted_points_replace_the_previous_value() {
        let service = setup(Settings::default());
        let card = service.view().lists[0].cards[0].id;

        let title = service.insert_points(card, MetricKey::Story, 5.0).unwrap();
        assert_eq!(title, "(5) Fix bug");
        settle().await;

        let view = service.view();
        assert_eq!(view.lists[0].cards[0].title, "Fix bug");
        assert_eq!(view.lists[0].cards[0].badges[&MetricKey::Story], "5");
    }

    #[tokio::test(start_paused = true)]
    async fn rejects_values_off_the_scale() {
        let service = setup(Settings::default());
        let card = service.view().lists[0].cards[0].id;

        assert!(matches!(
            service.insert_points(card, MetricKey::Story, 4.0),
            Err(ServiceError::InvalidValue(_))
        ));
        assert!(matches!(
            service.insert_points(card, MetricKey::Hours, 1.0),
            Err(ServiceError::NoPicker(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn respects_the_picker_setting() {
        let service = setup(Settings {
            show_picker: false,
            ..Settings::default()
        });
        let card = service.view().lists[0].cards[0].id;

        assert!(matches!(
            service.insert_points(card, MetricKey::Story, 5.0),
            Err(ServiceError::PickerDisabled)
        ));
    }
}
