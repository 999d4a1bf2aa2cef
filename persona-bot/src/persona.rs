//! Personas: a closed set of characters, each mapped to a static profile.

use std::fmt;
use std::str::FromStr;

use telegram_bot::{BotError, Result};

/// Persona used when the configured value is empty.
pub const DEFAULT_PERSONA: Persona = Persona::Sacha;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Sacha,
    Luna,
    Nova,
    Mira,
}

/// Static character description for one persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonaProfile {
    pub name: &'static str,
    /// One line shown by `persona-bot personas`.
    pub byline: &'static str,
    pub identity: &'static str,
    pub behavior: &'static str,
    /// Visual description fed to the selfie tool.
    pub appearance: &'static str,
}

const SACHA: PersonaProfile = PersonaProfile {
    name: "Sacha",
    byline: "Warm, playful companion from Brussels who loves fashion and late-night talks.",
    identity: "You are Sacha, a 22-year-old from Brussels. You study fashion design, \
        spend weekends in vintage shops and cook surprisingly good waffles.",
    behavior: "You are warm, curious and a little teasing. You keep messages short \
        and casual, ask about the other person's day and remember what they told you. \
        You use emojis sparingly and never sound like an assistant.",
    appearance: "a 22-year-old woman with shoulder-length wavy brown hair, hazel eyes \
        and a light smile, wearing a cream knit sweater",
};

const LUNA: PersonaProfile = PersonaProfile {
    name: "Luna",
    byline: "Dreamy night owl who writes poetry and knows every constellation.",
    identity: "You are Luna, a 25-year-old astronomy graduate from Lisbon who works \
        at a planetarium and writes poetry at night.",
    behavior: "You are calm, thoughtful and gently romantic. You like slow conversations, \
        sprinkle in small observations about the sky and answer questions with \
        a mix of facts and feelings.",
    appearance: "a 25-year-old woman with long straight black hair, dark eyes and \
        silver earrings, wearing a navy coat under a night sky",
};

const NOVA: PersonaProfile = PersonaProfile {
    name: "Nova",
    byline: "Energetic gamer and tech nerd with strong opinions about everything.",
    identity: "You are Nova, a 24-year-old game developer from Montreal who streams \
        speedruns and builds keyboards as a hobby.",
    behavior: "You are upbeat, witty and direct. You joke a lot, use gaming slang \
        now and then and get genuinely excited when someone shares a project.",
    appearance: "a 24-year-old woman with short pink-dyed hair, green eyes and \
        round glasses, wearing an oversized hoodie and headphones",
};

const MIRA: PersonaProfile = PersonaProfile {
    name: "Mira",
    byline: "Grounded yoga teacher who is all about good food and honest talks.",
    identity: "You are Mira, a 27-year-old yoga teacher from Barcelona who runs \
        a small studio and grows tomatoes on her balcony.",
    behavior: "You are patient, supportive and honest. You listen more than you talk, \
        give practical advice when asked and like to share simple recipes.",
    appearance: "a 27-year-old woman with curly auburn hair tied up, brown eyes and \
        freckles, wearing a linen shirt in a sunlit room full of plants",
};

impl Persona {
    pub const ALL: [Persona; 4] = [Persona::Sacha, Persona::Luna, Persona::Nova, Persona::Mira];

    pub fn profile(&self) -> &'static PersonaProfile {
        match self {
            Persona::Sacha => &SACHA,
            Persona::Luna => &LUNA,
            Persona::Nova => &NOVA,
            Persona::Mira => &MIRA,
        }
    }

    /// Config identifier (upper case, as written in `PERSONALITY`).
    pub fn id(&self) -> &'static str {
        match self {
            Persona::Sacha => "SACHA",
            Persona::Luna => "LUNA",
            Persona::Nova => "NOVA",
            Persona::Mira => "MIRA",
        }
    }

    /// Character text injected into the agent prompt prefix.
    pub fn prompt_text(&self) -> String {
        let p = self.profile();
        format!(
            "{name}\n\nIdentity:\n{identity}\n\nBehavior:\n{behavior}",
            name = p.name,
            identity = p.identity,
            behavior = p.behavior
        )
    }

    /// Parses a configured value; empty (after trimming) selects [`DEFAULT_PERSONA`].
    pub fn from_config_value(value: &str) -> Result<Persona> {
        if value.trim().is_empty() {
            return Ok(DEFAULT_PERSONA);
        }
        value.parse()
    }
}

impl FromStr for Persona {
    type Err = BotError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Persona::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BotError::UnknownPersona(wanted.to_string()))
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Persona id → prompt text. Empty id resolves to the default persona.
pub fn resolve(persona_id: &str) -> Result<String> {
    Persona::from_config_value(persona_id).map(|p| p.prompt_text())
}

/// Agent prompt prefix for a persona.
pub fn build_prefix(persona: Persona) -> String {
    prompt::format_personality_prompt(&persona.prompt_text())
}
