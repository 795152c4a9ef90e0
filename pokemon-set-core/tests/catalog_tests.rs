use anyhow::Result;
use pokemon_set_core::prelude::*;

const DEX: &str = r#"{
    "garchomp": {
        "name": "Garchomp",
        "type1": "Dragon",
        "type2": "Ground",
        "hp": 108, "atk": 130, "def": 95, "spa": 80, "spd": 85, "spe": 102,
        "ability1": "Sand Veil",
        "hidden ability": "Rough Skin",
        "format": "OU",
        "moves": ["earthquake", "dragonclaw"],
        "strategy: Swords Dance": "Ability: Rough Skin\n- Swords Dance\n- Earthquake\n- Dragon Claw\n- Fishious Rend",
        "Offensive": "@ Choice Band\nJolly Nature\nEVs: 252 Atk / 4 SpD / 252 Spe\n- Earthquake"
    },
    "heatran": {
        "name": "Heatran",
        "type1": "Fire",
        "type2": "Steel",
        "hp": 91, "atk": 90, "def": 106, "spa": 130, "spd": 106, "spe": 77,
        "strategy: Specs": "@ Choice Specs\nModest Nature\nEVs: 252 SpA / 4 SpD / 252 Spe\n- Earth Power\n- Flamethrower"
    }
}"#;

fn battler(dex: &Dex, side: Side, arg: &str, policy: &SelectionPolicy) -> Result<Battler> {
    let request = SetRequest::from_arg(arg);
    let selected = resolve_sets(dex, side, &request, policy)?;
    let (key, catalog) = dex.catalog(side, &request.species)?;
    let species = SpeciesData::from_catalog(key, catalog)?;
    Ok(Battler::from_set(&selected[0].set, &species, 50))
}

#[test]
fn prefixed_sets_feed_the_damage_engine() -> Result<()> {
    let dex = Dex::from_json_str(DEX, "inline")?;
    let policy = SelectionPolicy::default();
    let attacker = battler(&dex, Side::Attacker, "Garchomp", &policy)?;
    let defender = battler(&dex, Side::Defender, "heatran", &policy)?;
    assert_eq!(attacker.ability, "Rough Skin");
    assert_eq!(defender.stats.spa, 200);

    let calc = StandardCalc::builtin();
    let earthquake = calc.calculate(&attacker, &defender, "Earthquake", &Field::default())?;
    assert_eq!((earthquake.min(), earthquake.max()), (268, 324));

    let swords_dance = calc.calculate(&attacker, &defender, "Swords Dance", &Field::default())?;
    assert_eq!(swords_dance.max(), 0);

    let err = calc
        .calculate(&attacker, &defender, "Fishious Rend", &Field::default())
        .unwrap_err();
    assert_eq!(err, DamageError::UnknownMove("Fishious Rend".to_string()));
    Ok(())
}

#[test]
fn any_string_policy_includes_unprefixed_sets() -> Result<()> {
    let dex = Dex::from_json_str(DEX, "inline")?;
    let (key, catalog) = dex.catalog(Side::Attacker, "garchomp")?;
    let labels: Vec<String> =
        pokemon_set_core::catalog::select_sets(catalog, key, &SelectionPolicy::AnyString)
            .into_iter()
            .map(|entry| entry.label)
            .collect();
    assert_eq!(labels, vec!["strategy: Swords Dance", "Offensive"]);

    let banded = battler(&dex, Side::Attacker, "garchomp:offensive", &SelectionPolicy::AnyString)?;
    assert_eq!(banded.item, "Choice Band");
    assert_eq!(banded.stats.spe, 169);
    Ok(())
}

#[test]
fn label_lookup_respects_the_policy() -> Result<()> {
    let dex = Dex::from_json_str(DEX, "inline")?;
    let err = resolve_sets(
        &dex,
        Side::Attacker,
        &SetRequest::from_arg("garchomp:Offensive"),
        &SelectionPolicy::default(),
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "attacker species 'garchomp' has no set labelled 'Offensive'"
    );
    Ok(())
}
