//! Then steps for agent matching BDD scenarios.

use super::world::{MatchingWorld, split_names};
use rstest_bdd_macros::then;

#[then(r#"the ranking is "{expected}""#)]
fn ranking_is(world: &MatchingWorld, expected: String) -> Result<(), eyre::Report> {
    let actual: Vec<String> = world
        .ranking()?
        .iter()
        .map(|entry| entry.agent.name().as_str().to_owned())
        .collect();
    let wanted = split_names(&expected);
    if actual != wanted {
        return Err(eyre::eyre!("expected ranking {wanted:?}, got {actual:?}"));
    }
    Ok(())
}

#[then("the ranking is empty")]
fn ranking_is_empty(world: &MatchingWorld) -> Result<(), eyre::Report> {
    let ranking = world.ranking()?;
    if !ranking.is_empty() {
        return Err(eyre::eyre!("expected no matches, got {}", ranking.len()));
    }
    Ok(())
}

#[then(r#"agent "{name}" has score {score:usize}"#)]
fn agent_has_score(world: &MatchingWorld, name: String, score: usize) -> Result<(), eyre::Report> {
    let entry = world
        .ranking()?
        .iter()
        .find(|entry| entry.agent.name().as_str() == name)
        .ok_or_else(|| eyre::eyre!("agent '{name}' missing from ranking"))?;
    if entry.score != score {
        return Err(eyre::eyre!(
            "expected score {score} for '{name}', got {}",
            entry.score
        ));
    }
    Ok(())
}
