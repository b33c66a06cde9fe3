//! Player input grammar. Exploration and combat use separate command sets;
//! both parse leniently, with one-letter direction shortcuts and name
//! prefixes resolved downstream.

/// Commands available while exploring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Look,
    Move(String),
    Attack,
    Talk(Option<String>),
    Take(String),
    Drop(String),
    Shop,
    Buy(String),
    Inventory,
    Equip(String),
    Unequip(String),
    Use(String),
    Status,
    Stance(String),
    Rest,
    Estus,
    LevelUp(Option<String>),
    Quests,
    Lore,
    Save,
    Load,
    Help,
    Quit,
}

/// Commands available inside an encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatCommand {
    Attack,
    Special(String),
    Estus,
    Use(String),
    Stance(String),
    Status,
    Flee,
    Help,
}

fn split(input: &str) -> (String, String) {
    let trimmed = input.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim().to_string()),
        None => (trimmed.to_lowercase(), String::new()),
    }
}

fn direction(word: &str) -> Option<&'static str> {
    match word {
        "north" | "n" => Some("north"),
        "south" | "s" => Some("south"),
        "east" | "e" => Some("east"),
        "west" | "w" => Some("west"),
        _ => None,
    }
}

pub fn parse(input: &str) -> Option<Command> {
    let (head, rest) = split(input);
    if head.is_empty() {
        return None;
    }
    if let Some(dir) = direction(&head) {
        return Some(Command::Move(dir.to_string()));
    }
    match head.as_str() {
        "look" | "l" | "examine" | "x" => Some(Command::Look),
        "go" | "move" => direction(&rest.to_lowercase())
            .map(|d| Command::Move(d.to_string()))
            .or_else(|| {
                if rest.is_empty() {
                    None
                } else {
                    Some(Command::Move(rest.to_lowercase()))
                }
            }),
        "attack" | "fight" => Some(Command::Attack),
        "talk" | "speak" => Some(Command::Talk(if rest.is_empty() {
            None
        } else {
            Some(rest)
        })),
        "take" | "get" | "pickup" if !rest.is_empty() => Some(Command::Take(rest)),
        "drop" if !rest.is_empty() => Some(Command::Drop(rest)),
        "shop" | "wares" => Some(Command::Shop),
        "buy" if !rest.is_empty() => Some(Command::Buy(rest)),
        "inventory" | "inv" | "i" => Some(Command::Inventory),
        "equip" if !rest.is_empty() => Some(Command::Equip(rest)),
        "unequip" if !rest.is_empty() => Some(Command::Unequip(rest.to_lowercase())),
        "use" if !rest.is_empty() => Some(Command::Use(rest)),
        "status" | "stats" | "character" | "char" => Some(Command::Status),
        "stance" if !rest.is_empty() => Some(Command::Stance(rest.to_lowercase())),
        "rest" => Some(Command::Rest),
        "estus" | "drink" => Some(Command::Estus),
        "level" | "levelup" => Some(Command::LevelUp(if rest.is_empty() {
            None
        } else {
            Some(rest.to_lowercase())
        })),
        "quests" | "quest" | "journal" => Some(Command::Quests),
        "lore" => Some(Command::Lore),
        "save" => Some(Command::Save),
        "load" => Some(Command::Load),
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

pub fn parse_combat(input: &str) -> Option<CombatCommand> {
    let (head, rest) = split(input);
    match head.as_str() {
        "attack" | "a" => Some(CombatCommand::Attack),
        "special" | "skill" if !rest.is_empty() => Some(CombatCommand::Special(rest)),
        "estus" | "drink" => Some(CombatCommand::Estus),
        "use" if !rest.is_empty() => Some(CombatCommand::Use(rest)),
        "stance" if !rest.is_empty() => Some(CombatCommand::Stance(rest.to_lowercase())),
        "status" | "stats" => Some(CombatCommand::Status),
        "flee" | "run" => Some(CombatCommand::Flee),
        "help" | "?" => Some(CombatCommand::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_directions_move() {
        assert_eq!(parse("north"), Some(Command::Move("north".to_string())));
        assert_eq!(parse("  w "), Some(Command::Move("west".to_string())));
        assert_eq!(parse("go south"), Some(Command::Move("south".to_string())));
        assert_eq!(parse("go e"), Some(Command::Move("east".to_string())));
    }

    #[test]
    fn arguments_keep_their_case_for_name_matching() {
        assert_eq!(
            parse("take Ember Blade"),
            Some(Command::Take("Ember Blade".to_string()))
        );
        assert_eq!(parse("equip rusted"), Some(Command::Equip("rusted".to_string())));
    }

    #[test]
    fn argument_commands_require_an_argument() {
        assert_eq!(parse("take"), None);
        assert_eq!(parse("equip"), None);
        assert_eq!(parse("go"), None);
        assert_eq!(parse("talk"), Some(Command::Talk(None)));
        assert_eq!(parse("level"), Some(Command::LevelUp(None)));
    }

    #[test]
    fn trade_commands() {
        assert_eq!(parse("shop"), Some(Command::Shop));
        assert_eq!(parse("buy healing"), Some(Command::Buy("healing".to_string())));
        assert_eq!(parse("buy"), None);
        assert_eq!(parse("drop ember"), Some(Command::Drop("ember".to_string())));
    }

    #[test]
    fn unknown_and_empty_input_reject() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("dance"), None);
    }

    #[test]
    fn combat_grammar() {
        assert_eq!(parse_combat("a"), Some(CombatCommand::Attack));
        assert_eq!(
            parse_combat("special heavy"),
            Some(CombatCommand::Special("heavy".to_string()))
        );
        assert_eq!(
            parse_combat("stance AGGRESSIVE"),
            Some(CombatCommand::Stance("aggressive".to_string()))
        );
        assert_eq!(parse_combat("flee"), Some(CombatCommand::Flee));
        assert_eq!(parse_combat("north"), None);
    }
}
