//! Global field state

use super::catalog::EffectClass;
use super::effect::Effect;

/// Weather plus terrain and pseudo-weather entries
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldState {
    /// Current weather condition, at most one
    pub weather: Option<Effect>,

    /// Terrain and pseudo-weather, in the order they started
    pub effects: Vec<Effect>,
}

impl FieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or re-announce weather. A re-announcement of the weather already
    /// in place keeps its turn counter.
    pub fn set_weather(&mut self, effect: Effect) {
        match &self.weather {
            Some(current) if current.id == effect.id => {}
            _ => self.weather = Some(effect),
        }
    }

    pub fn clear_weather(&mut self) {
        self.weather = None;
    }

    /// Start a field effect. A terrain replaces any terrain already present.
    pub fn start(&mut self, effect: Effect, class: EffectClass, is_terrain: impl Fn(&str) -> bool) {
        if class == EffectClass::Terrain {
            self.effects.retain(|e| !is_terrain(&e.id));
        }
        if !self.has(&effect.id) {
            self.effects.push(effect);
        }
    }

    pub fn end(&mut self, id: &str) -> bool {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.id != id);
        self.effects.len() != before
    }

    pub fn has(&self, id: &str) -> bool {
        self.effects.iter().any(|effect| effect.id == id)
    }

    pub fn age_effects(&mut self) {
        if let Some(weather) = self.weather.as_mut() {
            weather.age();
        }
        self.effects.iter_mut().for_each(Effect::age);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_terrain(id: &str) -> bool {
        id.ends_with("terrain")
    }

    #[test]
    fn test_weather_reannounce_keeps_counter() {
        let mut field = FieldState::new();
        field.set_weather(Effect::named("RainDance"));
        field.age_effects();
        field.set_weather(Effect::named("RainDance"));

        assert_eq!(field.weather.as_ref().unwrap().turns_active, 1);

        field.set_weather(Effect::named("Sandstorm"));
        assert_eq!(field.weather.as_ref().unwrap().turns_active, 0);

        field.clear_weather();
        assert!(field.weather.is_none());
    }

    #[test]
    fn test_terrain_replaces_terrain() {
        let mut field = FieldState::new();
        field.start(Effect::named("Trick Room"), EffectClass::PseudoWeather, is_terrain);
        field.start(Effect::named("Electric Terrain"), EffectClass::Terrain, is_terrain);
        field.start(Effect::named("Psychic Terrain"), EffectClass::Terrain, is_terrain);

        assert_eq!(field.effects.len(), 2);
        assert!(field.has("trickroom"));
        assert!(field.has("psychicterrain"));
        assert!(!field.has("electricterrain"));
    }

    #[test]
    fn test_no_duplicate_effects() {
        let mut field = FieldState::new();
        field.start(Effect::named("Gravity"), EffectClass::PseudoWeather, is_terrain);
        field.start(Effect::named("Gravity"), EffectClass::PseudoWeather, is_terrain);
        assert_eq!(field.effects.len(), 1);
        assert!(field.end("gravity"));
    }
}
