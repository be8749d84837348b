mod tests {
    use embassy_time::{Duration, Instant};
    use goal_light_composer::detector::{
        CycleOutcome, EventDetector, GoalSide, PollIntervals, Reaction,
    };
    use goal_light_composer::error::{Error, Result};
    use goal_light_composer::feed::{
        GameId, GameNow, GameSnapshot, GameState, Goal, GoalList, ScoreFeed, Scorer, TeamScore,
    };
    use goal_light_composer::glyph::Mood;

    /// Feed returning whatever the test put in it last
    struct ScriptedFeed {
        game: Result<GameNow>,
        goals: Result<GoalList>,
        goal_queries: usize,
    }

    impl ScriptedFeed {
        fn live(id: GameId, home: u32, away: u32) -> Self {
            Self {
                game: Ok(game(id, GameState::Live, home, away)),
                goals: Ok(GoalList::new()),
                goal_queries: 0,
            }
        }

        fn set_goals(&mut self, teams: &[(&str, u16)]) {
            let mut goals = GoalList::new();
            for (i, (team, number)) in teams.iter().enumerate() {
                let scorer = Scorer::new("Player", Some(*number), team);
                goals.push(Goal::new(1, "05:00", scorer, 0, i as u32)).unwrap();
            }
            self.goals = Ok(goals);
        }
    }

    impl ScoreFeed for ScriptedFeed {
        fn game_now(&mut self, _team: &str) -> Result<GameNow> {
            self.game.clone()
        }

        fn goals(&mut self, _game: GameId) -> Result<GoalList> {
            self.goal_queries += 1;
            self.goals.clone()
        }
    }

    fn game(id: GameId, state: GameState, home: u32, away: u32) -> GameNow {
        GameNow::Game(GameSnapshot {
            id,
            state,
            home: TeamScore::new("MTL", home),
            away: TeamScore::new("WSH", away),
        })
    }

    fn detector() -> EventDetector {
        EventDetector::new("MTL", PollIntervals::default(), Duration::from_secs(20))
    }

    fn secs(s: u64) -> Instant {
        Instant::from_secs(s)
    }

    fn goals_of(reactions: &[Reaction]) -> Vec<(String, Option<u16>, GoalSide)> {
        reactions
            .iter()
            .filter_map(|reaction| match reaction {
                Reaction::Goal(event) => Some((
                    event.goal.scorer.team.to_string(),
                    event.goal.scorer.number,
                    event.side,
                )),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_goal_list_is_only_a_baseline() {
        let mut feed = ScriptedFeed::live(1, 1, 0);
        feed.set_goals(&[("MTL", 22)]);
        let mut detector = detector();

        let report = detector.poll(&mut feed, secs(0)).unwrap();
        assert!(goals_of(&report.reactions).is_empty());
        assert_eq!(detector.tracking().last_goal_count, Some(1));
    }

    #[test]
    fn new_goal_fires_once_with_count_updated() {
        let mut feed = ScriptedFeed::live(1, 1, 0);
        feed.set_goals(&[("MTL", 22)]);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();

        feed.set_goals(&[("MTL", 22), ("MTL", 14)]);
        let report = detector.poll(&mut feed, secs(2)).unwrap();
        assert_eq!(
            goals_of(&report.reactions),
            vec![("MTL".to_string(), Some(14), GoalSide::For)]
        );
        // Count is committed before the caller plays anything
        assert_eq!(detector.tracking().last_goal_count, Some(2));

        let report = detector.poll(&mut feed, secs(4)).unwrap();
        assert!(goals_of(&report.reactions).is_empty());
    }

    #[test]
    fn only_latest_of_several_new_goals_is_reported() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();

        feed.set_goals(&[("WSH", 8), ("MTL", 22), ("WSH", 19)]);
        let report = detector.poll(&mut feed, secs(2)).unwrap();
        let Some(Reaction::Goal(event)) = report.reactions.last() else {
            panic!("expected a goal reaction");
        };
        assert_eq!(event.goal.scorer.number, Some(19));
        assert_eq!(event.side, GoalSide::Against);
        assert_eq!(event.skipped, 2);
        assert_eq!(detector.tracking().last_goal_count, Some(3));
    }

    #[test]
    fn start_mood_fires_once_per_game() {
        let mut feed = ScriptedFeed::live(1, 2, 1);
        let mut detector = detector();

        let first = detector.poll(&mut feed, secs(0)).unwrap();
        assert!(matches!(
            first.reactions.first(),
            Some(Reaction::StartMood(cue)) if cue.mood == Mood::Happy
        ));
        for t in 1..5 {
            let report = detector.poll(&mut feed, secs(t * 2)).unwrap();
            assert!(report.reactions.is_empty());
        }
    }

    #[test]
    fn game_change_resets_tracking() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        feed.set_goals(&[("MTL", 22)]);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();
        detector.arm_mood_timer(secs(1));

        feed.game = Ok(game(2, GameState::Live, 0, 1));
        feed.set_goals(&[]);
        let report = detector.poll(&mut feed, secs(3)).unwrap();

        assert!(matches!(
            report.reactions.first(),
            Some(Reaction::StartMood(cue)) if cue.mood == Mood::Sad && cue.colors_of == "WSH"
        ));
        let tracking = detector.tracking();
        assert_eq!(tracking.game_id, Some(2));
        assert_eq!(tracking.emoji_shown_for_game, Some(2));
        assert_eq!(tracking.emoji_due_at, None);
        assert_eq!(tracking.last_goal_count, Some(0));
    }

    #[test]
    fn scheduled_mood_is_one_shot() {
        let mut feed = ScriptedFeed::live(1, 1, 1);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();
        detector.arm_mood_timer(secs(10));

        let early = detector.poll(&mut feed, secs(29)).unwrap();
        assert!(early.reactions.is_empty());
        assert_eq!(detector.tracking().emoji_due_at, Some(secs(30)));

        // Score changed since the timer was armed
        feed.game = Ok(game(1, GameState::Live, 2, 1));
        let due = detector.poll(&mut feed, secs(30)).unwrap();
        assert!(matches!(
            due.reactions.as_slice(),
            [Reaction::ScheduledMood(cue)] if cue.mood == Mood::Happy
        ));
        assert_eq!(detector.tracking().emoji_due_at, None);

        let later = detector.poll(&mut feed, secs(35)).unwrap();
        assert!(later.reactions.is_empty());
    }

    #[test]
    fn goal_replaces_pending_mood_timer() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();
        detector.arm_mood_timer(secs(0));

        feed.set_goals(&[("WSH", 8)]);
        let report = detector.poll(&mut feed, secs(25)).unwrap();
        assert_eq!(report.reactions.len(), 1);
        assert!(matches!(report.reactions[0], Reaction::Goal(_)));
        assert_eq!(detector.tracking().emoji_due_at, None);
    }

    #[test]
    fn no_game_clears_everything() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();
        detector.arm_mood_timer(secs(0));

        feed.game = Ok(GameNow::no_game("Next game tomorrow"));
        let report = detector.poll(&mut feed, secs(2)).unwrap();
        assert_eq!(report.cadence, Duration::from_secs(1200));
        assert!(matches!(
            report.outcome,
            CycleOutcome::NoGame { ref message } if message == "Next game tomorrow"
        ));
        assert_eq!(*detector.tracking(), Default::default());
    }

    #[test]
    fn feed_error_keeps_tracking() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        feed.set_goals(&[("MTL", 22)]);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();
        let before = *detector.tracking();

        feed.game = Err(Error::FeedUnavailable);
        assert_eq!(detector.poll(&mut feed, secs(2)), Err(Error::FeedUnavailable));
        assert_eq!(*detector.tracking(), before);
    }

    #[test]
    fn goal_query_failure_skips_detection() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        feed.set_goals(&[("MTL", 22)]);
        let mut detector = detector();
        detector.poll(&mut feed, secs(0)).unwrap();

        feed.goals = Err(Error::FeedUnavailable);
        let report = detector.poll(&mut feed, secs(2)).unwrap();
        assert!(report.reactions.is_empty());
        assert!(matches!(report.outcome, CycleOutcome::Game(_)));
        assert_eq!(detector.tracking().last_goal_count, Some(1));
    }

    #[test]
    fn goals_not_queried_outside_tracked_states() {
        let mut feed = ScriptedFeed::live(1, 0, 0);
        feed.game = Ok(game(1, GameState::Final, 3, 2));
        let mut detector = detector();

        let report = detector.poll(&mut feed, secs(0)).unwrap();
        assert_eq!(feed.goal_queries, 0);
        assert_eq!(report.cadence, Duration::from_secs(600));
        assert_eq!(detector.tracking().last_goal_count, None);
    }
}
