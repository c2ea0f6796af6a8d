use rand::Rng;

pub const HERO_MAX_HP: i32 = 100;
pub const BASE_MONSTER_HP: i32 = 60;
pub const BASE_HERO_DAMAGE: i32 = 15;
pub const BASE_MONSTER_DAMAGE: i32 = 12;
pub const DEFEAT_HEAL: i32 = 25;

/// Ticks a hit flash stays visible.
const FLASH_TICKS: u8 = 4;
/// Ticks a floating damage marker stays visible.
const FLOATING_TICKS: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monster {
    pub name: &'static str,
    pub sprite: &'static str,
}

pub const MONSTERS: [Monster; 5] = [
    Monster {
        name: "Slime",
        sprite: "( o_o )",
    },
    Monster {
        name: "Bat",
        sprite: "/|^.^|\\",
    },
    Monster {
        name: "Goblin",
        sprite: "(>_<#)",
    },
    Monster {
        name: "Dragon",
        sprite: "<=`o'=>",
    },
    Monster {
        name: "Demon",
        sprite: "[x_x]",
    },
];

pub const HERO_SPRITE: &str = "o[-|-]o";

#[derive(Debug, Clone)]
pub struct FloatingText {
    pub text: String,
    pub over_hero: bool,
    pub ttl: u8,
}

/// What a resolved answer did to the battlefield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    MonsterHit { damage: i32 },
    MonsterDefeated { new_level: u32, healed: i32 },
    HeroHit { damage: i32 },
    HeroDefeated,
}

#[derive(Debug, Clone)]
pub struct BattleState {
    pub level: u32,
    pub hero_hp: i32,
    pub hero_max_hp: i32,
    pub monster_hp: i32,
    pub monster_max_hp: i32,
    pub hero_base_damage: i32,
    pub monster_base_damage: i32,
    pub monster: Monster,
    // Cosmetic state advanced by tick().
    pub hero_flash: u8,
    pub monster_flash: u8,
    pub bounce_phase: u8,
    pub floating: Vec<FloatingText>,
}

impl BattleState {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        BattleState {
            level: 1,
            hero_hp: HERO_MAX_HP,
            hero_max_hp: HERO_MAX_HP,
            monster_hp: BASE_MONSTER_HP,
            monster_max_hp: BASE_MONSTER_HP,
            hero_base_damage: BASE_HERO_DAMAGE,
            monster_base_damage: BASE_MONSTER_DAMAGE,
            monster: MONSTERS[rng.gen_range(0..MONSTERS.len())],
            hero_flash: 0,
            monster_flash: 0,
            bounce_phase: 0,
            floating: Vec::new(),
        }
    }

    /// Streaks add up to 5 bonus damage on top of the level scaling.
    pub fn hero_damage(&self, streak: usize) -> i32 {
        self.hero_base_damage + (self.level as i32 - 1) * 2 + (streak.min(5) as i32)
    }

    pub fn monster_damage(&self) -> i32 {
        self.monster_base_damage + (self.level as i32 - 1) * 2
    }

    /// A correct answer: the hero strikes. Defeating the monster levels up,
    /// heals the hero, scales the next monster's HP and re-rolls its kind.
    pub fn resolve_correct<R: Rng>(&mut self, streak: usize, rng: &mut R) -> BattleEvent {
        let damage = self.hero_damage(streak);
        self.monster_hp = (self.monster_hp - damage).max(0);
        self.monster_flash = FLASH_TICKS;
        self.push_floating(format!("-{}", damage), false);

        if self.monster_hp > 0 {
            return BattleEvent::MonsterHit { damage };
        }

        self.level += 1;
        self.monster_max_hp =
            (BASE_MONSTER_HP as f64 * 1.25f64.powi(self.level as i32 - 1)) as i32;
        self.monster_hp = self.monster_max_hp;
        self.monster = MONSTERS[rng.gen_range(0..MONSTERS.len())];

        let healed = (self.hero_max_hp - self.hero_hp).min(DEFEAT_HEAL);
        self.hero_hp += healed;

        if self.level % 3 == 0 {
            self.hero_base_damage += 2;
        }

        BattleEvent::MonsterDefeated {
            new_level: self.level,
            healed,
        }
    }

    /// A wrong answer: the monster counter-attacks.
    pub fn resolve_incorrect(&mut self) -> BattleEvent {
        let damage = self.monster_damage();
        self.hero_hp = (self.hero_hp - damage).max(0);
        self.hero_flash = FLASH_TICKS;
        self.push_floating(format!("-{}", damage), true);

        if self.hero_hp > 0 {
            BattleEvent::HeroHit { damage }
        } else {
            BattleEvent::HeroDefeated
        }
    }

    fn push_floating(&mut self, text: String, over_hero: bool) {
        self.floating.push(FloatingText {
            text,
            over_hero,
            ttl: FLOATING_TICKS,
        });
    }

    /// Advance the cosmetic state by one animation tick.
    pub fn tick(&mut self) {
        self.bounce_phase = self.bounce_phase.wrapping_add(1);
        self.hero_flash = self.hero_flash.saturating_sub(1);
        self.monster_flash = self.monster_flash.saturating_sub(1);
        for item in &mut self.floating {
            item.ttl = item.ttl.saturating_sub(1);
        }
        self.floating.retain(|item| item.ttl > 0);
    }
}
