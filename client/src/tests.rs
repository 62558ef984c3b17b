#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use anyhow::Result;

    use crate::{
        BattleError, BattleSession, ClientConfig, DecisionKind, Phase, SessionError, Signal,
        Transport,
    };

    const ROOM: &str = "battle-gen7randombattle-42";

    /// Scripted in-memory transport. Frames are handed out in order; once
    /// the script runs out the peer looks closed.
    #[derive(Clone, Default)]
    struct MockTransport {
        incoming: Arc<Mutex<VecDeque<String>>>,
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl MockTransport {
        fn push(&self, frame: impl Into<String>) {
            self.incoming.lock().unwrap().push_back(frame.into());
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }

        fn clear_sent(&self) {
            self.sent.lock().unwrap().clear();
        }
    }

    impl Transport for MockTransport {
        async fn send(&mut self, line: String) -> Result<()> {
            self.sent.lock().unwrap().push(line);
            Ok(())
        }

        async fn receive(&mut self) -> Result<Option<String>> {
            Ok(self.incoming.lock().unwrap().pop_front())
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn request(rqid: u64, active: &str) -> String {
        format!(
            r#"|request|{{"active":[{{"moves":{active}}}],"side":{{"name":"vantagebot","id":"p1","pokemon":[{{"ident":"p1: Garchomp","details":"Garchomp, L78, F","condition":"270/270","active":true,"stats":{{"atk":240,"def":200,"spa":170,"spd":180,"spe":210}},"moves":["earthquake","outrage"],"baseAbility":"roughskin","item":"lifeorb"}},{{"ident":"p1: Magnezone","details":"Magnezone, L84","condition":"250/250","active":false,"stats":{{"atk":140,"def":248,"spa":265,"spd":182,"spe":140}},"moves":["thunderbolt","voltswitch"],"baseAbility":"magnetpull","item":"choicespecs"}}]}},"rqid":{rqid}}}"#
        )
    }

    const MOVES: &str = r#"[{"move":"Earthquake","id":"earthquake","pp":16,"maxpp":16,"target":"allAdjacent","disabled":false},{"move":"Outrage","id":"outrage","pp":0,"maxpp":16,"target":"randomNormal","disabled":false}]"#;

    fn battle_start() -> String {
        format!(
            ">{ROOM}\n|init|battle\n|title|vantagebot vs. Somebody\n{}\n|player|p1|vantagebot|1|\n|player|p2|Somebody|2|\n|gen|7\n|start\n|switch|p1a: Garchomp|Garchomp, L78, F|270/270\n|switch|p2a: Metagross|Metagross|100/100\n|turn|1",
            request(2, MOVES)
        )
    }

    fn session(transport: &MockTransport) -> BattleSession<MockTransport> {
        BattleSession::logged_in(transport.clone(), ClientConfig::default(), "vantagebot")
    }

    async fn started(transport: &MockTransport) -> BattleSession<MockTransport> {
        transport.push("|updatesearch|{\"searching\":[\"gen7randombattle\"]}");
        transport.push(battle_start());

        let mut session = session(transport);
        assert_eq!(session.reset().await.unwrap(), Signal::Decide);
        session
    }

    #[tokio::test]
    async fn test_reset_runs_to_first_decision() {
        let transport = MockTransport::default();
        let session = started(&transport).await;

        assert_eq!(
            transport.sent(),
            vec![
                "|/utm null".to_string(),
                "|/search gen7randombattle".to_string(),
                format!("{ROOM}|/timer on"),
            ]
        );

        assert!(session.decision_pending());
        let state = session.state();
        assert_eq!(state.phase, Phase::Ongoing);
        assert_eq!(state.turn, 1);
        assert_eq!(state.opponent.name, "Somebody");

        let legal = session.legal_actions().unwrap();
        assert_eq!(legal.kind, DecisionKind::Free);
        assert_eq!(legal.moves, vec![1]);
        assert_eq!(legal.switches, vec![2]);
    }

    #[tokio::test]
    async fn test_illegal_action_sends_nothing() {
        let transport = MockTransport::default();
        let mut session = started(&transport).await;
        transport.clear_sent();
        let before = session.state().clone();

        let result = session.submit_move(2, false, false).await;
        assert!(matches!(
            result,
            Err(SessionError::Battle(BattleError::IllegalAction(_)))
        ));

        let result = session.submit_switch(3).await;
        assert!(matches!(
            result,
            Err(SessionError::Battle(BattleError::IllegalAction(_)))
        ));

        assert!(transport.sent().is_empty());
        assert!(session.decision_pending());
        assert_eq!(session.state(), &before);
    }

    #[tokio::test]
    async fn test_submit_move_until_end() {
        let transport = MockTransport::default();
        let mut session = started(&transport).await;
        transport.clear_sent();

        transport.push(format!(">{ROOM}\n{}", request(3, MOVES)));
        transport.push(format!(
            ">{ROOM}\n|\n|move|p1a: Garchomp|Earthquake|p2a: Metagross\n|-damage|p2a: Metagross|40/100\n|move|p2a: Metagross|Meteor Mash|p1a: Garchomp\n|-damage|p1a: Garchomp|200/270\n|\n|upkeep\n|turn|2"
        ));

        assert_eq!(session.submit_move(1, false, false).await.unwrap(), Signal::Decide);
        assert_eq!(
            transport.sent(),
            vec![format!("{ROOM}|/choose move 1|2")]
        );
        assert_eq!(session.state().turn, 2);
        assert_eq!(session.state().rqid(), Some(3));
        assert_eq!(session.state().opponent.active().moves[0].id, "meteormash");

        transport.push(format!(">{ROOM}\n|request|"));
        transport.push(format!(
            ">{ROOM}\n|\n|move|p1a: Garchomp|Earthquake|p2a: Metagross\n|-damage|p2a: Metagross|0 fnt\n|faint|p2a: Metagross\n|\n|win|vantagebot"
        ));

        assert_eq!(session.submit_switch(2).await.unwrap(), Signal::Ended);
        assert_eq!(session.state().phase, Phase::Win);
        assert!(!session.decision_pending());
        assert!(session.legal_actions().is_none());

        let result = session.submit_move(1, false, false).await;
        assert!(matches!(result, Err(SessionError::Battle(_))));
    }

    #[tokio::test]
    async fn test_reset_forfeits_running_battle() {
        let transport = MockTransport::default();
        let mut session = started(&transport).await;
        transport.clear_sent();

        transport.push(format!(">{ROOM}\n|\n|-message|vantagebot forfeited.\n|\n|win|Somebody"));
        transport.push(format!(">{ROOM}\n|deinit"));
        transport.push(battle_start().replace(ROOM, "battle-gen7randombattle-43"));

        assert_eq!(session.reset().await.unwrap(), Signal::Decide);

        let sent = transport.sent();
        assert_eq!(sent[0], format!("{ROOM}|/forfeit"));
        assert_eq!(sent[1], format!("|/leave {ROOM}"));
        assert_eq!(sent[2], "|/utm null");
        assert_eq!(sent[3], "|/search gen7randombattle");

        let state = session.state();
        assert_eq!(state.room.as_deref(), Some("battle-gen7randombattle-43"));
        assert_eq!(state.turn, 1);
        assert!(!state.forfeited);
    }

    #[tokio::test]
    async fn test_team_preview_is_answered() {
        let transport = MockTransport::default();
        let preview = r#"|request|{"teamPreview":true,"side":{"name":"vantagebot","id":"p1","pokemon":[]},"rqid":1}"#;
        transport.push(format!(
            ">{ROOM}\n|init|battle\n{preview}\n|player|p1|vantagebot|1|\n|player|p2|Somebody|2|\n|teampreview"
        ));
        transport.push(battle_start());

        let mut session = session(&transport);
        assert_eq!(session.reset().await.unwrap(), Signal::Decide);
        assert!(
            transport
                .sent()
                .contains(&format!("{ROOM}|/choose default|1"))
        );
        assert_eq!(session.legal_actions().unwrap().kind, DecisionKind::Free);
    }

    #[tokio::test]
    async fn test_closed_transport() {
        let transport = MockTransport::default();
        let mut session = session(&transport);

        let result = session.reset().await;
        assert!(matches!(result, Err(SessionError::Closed)));
    }

    #[tokio::test]
    async fn test_close_ends_session() {
        let transport = MockTransport::default();
        let mut session = started(&transport).await;

        session.close().await.unwrap();
        assert!(!session.decision_pending());
        assert!(matches!(session.reset().await, Err(SessionError::Closed)));
        assert!(matches!(
            session.submit_move(1, false, false).await,
            Err(SessionError::Closed)
        ));
    }
}
