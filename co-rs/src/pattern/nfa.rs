use super::segment::{Segment, SegmentMatcher, Token};
use crate::error::InvalidPatternError;

/// A segment-level NFA for one pattern. Each transition consumes exactly one
/// path segment; `**` is modelled as an epsilon edge into a state that loops
/// on any segment. Simulation walks a set of states, so matching is linear in
/// the number of path segments and never backtracks.
#[derive(Debug, Clone)]
pub(crate) struct Nfa {
    states: Vec<State>,
}

impl Nfa {
    const START_STATE: StateId = StateId(0);

    /// Build the automaton. `floating` patterns may start at any depth;
    /// `recursive` patterns also match everything beneath a matched path.
    pub(crate) fn build(
        segments: &[Segment],
        floating: bool,
        recursive: bool,
    ) -> Result<Nfa, InvalidPatternError> {
        let mut nfa = Nfa {
            states: vec![State::new()],
        };

        let start_state_id = if floating {
            nfa.add_epsilon_transition(Self::START_STATE)
        } else {
            Self::START_STATE
        };

        let mut end_state_id = start_state_id;
        for segment in segments {
            end_state_id = match segment {
                Segment::DoubleStar => nfa.add_epsilon_transition(end_state_id),
                Segment::Glob(tokens) => nfa.add_transition(end_state_id, tokens)?,
            };
        }

        // A trailing `/**` matches everything inside the directory but not
        // the directory itself, so one more segment is required
        if segments.last() == Some(&Segment::DoubleStar) {
            end_state_id = nfa.add_transition(end_state_id, &[Token::Star])?;
        }

        if recursive {
            end_state_id = nfa.add_epsilon_transition(end_state_id);
        }

        nfa.state_mut(end_state_id).terminal = true;
        Ok(nfa)
    }

    pub(crate) fn is_match<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> bool {
        let mut current = self.closure(vec![Self::START_STATE]);
        for segment in segments {
            let mut next_states = Vec::new();
            for &state_id in &current {
                self.state(state_id)
                    .transitions
                    .iter()
                    .filter(|transition| transition.matcher.is_match(segment))
                    .for_each(|transition| next_states.push(transition.target));
            }
            if next_states.is_empty() {
                return false;
            }
            current = self.closure(next_states);
        }
        current.iter().any(|&id| self.state(id).terminal)
    }

    // Follow epsilon edges until no new states appear, dropping duplicates so
    // the working set never grows past the number of states.
    fn closure(&self, mut states: Vec<StateId>) -> Vec<StateId> {
        let mut seen = vec![false; self.states.len()];
        let mut idx = 0;
        while idx < states.len() {
            let id = states[idx];
            if seen[id.index()] {
                states.swap_remove(idx);
                continue;
            }
            seen[id.index()] = true;
            if let Some(next) = self.state(id).epsilon_transition {
                states.push(next);
            }
            idx += 1;
        }
        states
    }

    fn add_transition(
        &mut self,
        from_id: StateId,
        tokens: &[Token],
    ) -> Result<StateId, InvalidPatternError> {
        let matcher = SegmentMatcher::new(tokens)?;
        let state_id = self.add_state();
        self.state_mut(from_id).transitions.push(Transition {
            matcher,
            target: state_id,
        });
        Ok(state_id)
    }

    fn add_epsilon_transition(&mut self, from_id: StateId) -> StateId {
        // Consecutive `**` segments collapse into one; stacking loop states
        // would demand extra path segments, which gitignore does not
        let has_self_loop = self.state(from_id).transitions.iter().any(|t| {
            t.target == from_id && matches!(t.matcher, SegmentMatcher::Unconditional)
        });
        if has_self_loop {
            return from_id;
        }

        match self.state(from_id).epsilon_transition {
            Some(to_id) => to_id,
            None => {
                let state_id = self.add_state();
                self.state_mut(state_id).transitions.push(Transition {
                    matcher: SegmentMatcher::Unconditional,
                    target: state_id,
                });
                self.state_mut(from_id).epsilon_transition = Some(state_id);
                state_id
            }
        }
    }

    fn add_state(&mut self) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(State::new());
        id
    }

    #[inline]
    fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    #[inline]
    fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.index()]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct StateId(u32);

impl StateId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct State {
    terminal: bool,
    transitions: Vec<Transition>,
    epsilon_transition: Option<StateId>,
}

impl State {
    fn new() -> Self {
        Self {
            terminal: false,
            transitions: Vec::new(),
            epsilon_transition: None,
        }
    }
}

#[derive(Debug, Clone)]
struct Transition {
    matcher: SegmentMatcher,
    target: StateId,
}
