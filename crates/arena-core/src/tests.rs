#[cfg(test)]
mod tests {
    use crate::class_tree::ClassNodeId;
    use crate::commands::PlayerCommand;
    use crate::config::{ConfigError, MatchConfig};
    use crate::enums::*;
    use crate::events::{AudioEvent, SoundCue, SOUND_TABLE};
    use crate::state::GameStateSnapshot;
    use crate::types::{Rect, ShipId, SimTime, Vec2};

    #[test]
    fn test_weapon_kind_serde() {
        for w in WeaponKind::ALL {
            let json = serde_json::to_string(&w).unwrap();
            let back: WeaponKind = serde_json::from_str(&json).unwrap();
            assert_eq!(w, back);
        }
    }

    #[test]
    fn test_weapon_index_matches_all() {
        for (i, w) in WeaponKind::ALL.iter().enumerate() {
            assert_eq!(w.index(), i);
        }
    }

    #[test]
    fn test_command_tagged_json() {
        let cmd: PlayerCommand =
            serde_json::from_str(r#"{"type":"AcquireClassNode","node":"TripleTwin"}"#).unwrap();
        match cmd {
            PlayerCommand::AcquireClassNode { node } => assert_eq!(node, ClassNodeId::TripleTwin),
            other => panic!("unexpected {other:?}"),
        }

        let cmd: PlayerCommand =
            serde_json::from_str(r#"{"type":"ApplyUpgrade","key":{"Weapon":"Laser"}}"#).unwrap();
        assert!(matches!(
            cmd,
            PlayerCommand::ApplyUpgrade { key: UpgradeKey::Weapon(WeaponKind::Laser) }
        ));

        let json = serde_json::to_string(&PlayerCommand::Pause).unwrap();
        assert_eq!(json, r#"{"type":"Pause"}"#);
    }

    #[test]
    fn test_random_upgrade_pool() {
        let pool = UpgradeKey::random_pool();
        assert_eq!(pool.len(), 9 + WeaponKind::COUNT);
        assert!(!pool.contains(&UpgradeKey::Teleport));
        assert!(!pool.contains(&UpgradeKey::Ultimate));
    }

    #[test]
    fn test_sound_table_is_indexed_by_cue() {
        for (i, (cue, id)) in SOUND_TABLE.iter().enumerate() {
            assert_eq!(*cue as usize, i);
            assert_eq!(cue.effect_id(), *id);
        }
    }

    #[test]
    fn test_event_cues() {
        let fired = AudioEvent::WeaponFired { ship: ShipId(1), weapon: WeaponKind::Laser };
        assert_eq!(fired.cue(), SoundCue::Laser);
        let crit = AudioEvent::Hit {
            ship: ShipId(2),
            amount: 24.0,
            shielded: true,
            critical: true,
            damage_type: DamageType::Normal,
        };
        assert_eq!(crit.cue(), SoundCue::Critical);
        assert_eq!(crit.cue().effect_id(), "critical");
        let shield = AudioEvent::Hit {
            ship: ShipId(2),
            amount: 12.0,
            shielded: true,
            critical: false,
            damage_type: DamageType::Acid,
        };
        assert_eq!(shield.cue().effect_id(), "hit_shield");
    }

    #[test]
    fn test_default_config_is_valid() {
        MatchConfig::default().validate().unwrap();
    }

    #[test]
    fn test_config_partial_toml() {
        let cfg = MatchConfig::from_toml_str("num_teams = 4\ncapture_time = 5.5\nseed = 42\n").unwrap();
        assert_eq!(cfg.num_teams, 4);
        assert!((cfg.capture_time - 5.5).abs() < 1e-12);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.team_size, MatchConfig::default().team_size);
    }

    #[test]
    fn test_config_rejects_bad_values() {
        let err = MatchConfig::from_toml_str("num_teams = 7").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "num_teams", .. }));

        let err = MatchConfig::from_toml_str("capture_time = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "capture_time", .. }));

        let err = MatchConfig::from_toml_str("arena_width = 500.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "arena_width", .. }));
    }

    #[test]
    fn test_config_rejects_unknown_and_malformed() {
        assert!(matches!(
            MatchConfig::from_toml_str("gravity = 9.8"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            MatchConfig::from_toml_str("num_teams = \"two\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_missing_file() {
        let err = MatchConfig::load("/nonexistent/arena.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().starts_with("cannot read config"));
    }

    #[test]
    fn test_rect_helpers() {
        let r = Rect::new(300.0, 300.0, 600.0, 600.0);
        assert_eq!(r.center(), Vec2::new(600.0, 600.0));
        assert!(r.contains(Vec2::new(300.0, 900.0)));
        assert!(!r.contains(Vec2::new(299.0, 500.0)));
        let inner = r.inset(40.0);
        assert!((inner.w - 520.0).abs() < 1e-12);
        assert!(r.intersects(&inner));
        let tiny = Rect::new(0.0, 0.0, 10.0, 10.0).inset(40.0);
        assert_eq!(tiny.w, 0.0);
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).intersects(&Rect::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut t = SimTime::default();
        t.advance(0.5);
        t.advance(0.25);
        assert_eq!(t.tick, 2);
        assert!((t.elapsed_secs - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Menu);
        assert!(back.ships.is_empty());
    }
}
