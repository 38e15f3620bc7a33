//! The shared two-level predictor engine.

use bitvec::prelude::*;
use log::{ debug, trace };

use crate::bit::*;
use crate::branch::*;
use crate::config::PredictorConfig;
use crate::error::PredictorError;
use crate::history::*;
use crate::logic::{ count, counter_direction, hash };
use crate::predictor::*;
use crate::table::HistoryTable;

/// First-level state: the branch history register(s).
#[derive(Clone, Debug)]
enum History {
    Global(ShiftRegister),
    PerAddress(RegisterBank),
    PerSet(RegisterBank),
}

impl History {
    fn monitor(&self) -> String {
        match self {
            Self::Global(r) => r.monitor(),
            Self::PerAddress(bank) | Self::PerSet(bank) => bank.monitor(),
        }
    }
}

/// A two-level adaptive predictor.
///
/// The first level records branch outcomes in one or more history
/// registers. The second level is a table of saturating counters indexed
/// by history (and, for some organizations, by the branch address).
/// The [Variant] decides how the two levels are wired together.
#[derive(Clone, Debug)]
pub struct TwoLevelPredictor {
    variant: Variant,
    cfg: PredictorConfig,

    history: History,

    /// Pattern history table
    pht: HistoryTable,

    /// Working register holding the counter selected by the last lookup
    sc: ShiftRegister,
}

impl TwoLevelPredictor {
    pub fn new(variant: Variant, cfg: PredictorConfig)
        -> Result<Self, PredictorError>
    {
        cfg.validate()?;

        let h = cfg.history_bits;
        let history = match variant.history_scope() {
            HistoryScope::Global => {
                History::Global(ShiftRegister::new("BHR", h))
            },
            HistoryScope::PerAddress => History::PerAddress(
                RegisterBank::new("PABHR", cfg.address_bits, h)
            ),
            HistoryScope::PerSet => History::PerSet(
                RegisterBank::new("PSBHR", cfg.set_bits, h)
            ),
        };

        let pht = match variant.index_scheme() {
            IndexScheme::History => {
                HistoryTable::new("PHT", h, cfg.counter_bits)
            },
            IndexScheme::SelectedHistory => HistoryTable::with_selector(
                "PSPHT", cfg.set_bits, h, cfg.counter_bits
            ),
            IndexScheme::AddressHistory => HistoryTable::new(
                "PAPHT", cfg.address_bits + h, cfg.counter_bits
            ),
            IndexScheme::SetHistory => HistoryTable::new(
                "PSPHT", cfg.set_bits + h, cfg.counter_bits
            ),
        };

        debug!("{} predictor: history={} counter={} address={} set={}, \
            table capacity 2^{}",
            variant, h, cfg.counter_bits, cfg.address_bits, cfg.set_bits,
            pht.capacity_bits()
        );

        Ok(Self {
            variant,
            cfg,
            history,
            pht,
            sc: ShiftRegister::new("SC", cfg.counter_bits),
        })
    }

    pub fn variant(&self) -> Variant { self.variant }
    pub fn config(&self) -> &PredictorConfig { &self.cfg }

    /// Returns a reference to the pattern history table.
    pub fn pht(&self) -> &HistoryTable { &self.pht }

    /// Returns a reference to the working counter register.
    pub fn counter(&self) -> &ShiftRegister { &self.sc }

    /// Returns the history register that feeds predictions for this branch,
    /// if it exists yet.
    pub fn history(&self, inst: &BranchInstruction) -> Option<&ShiftRegister> {
        match &self.history {
            History::Global(r) => Some(r),
            History::PerAddress(bank) => bank.get(inst.address()),
            History::PerSet(bank) => {
                let set = hash(inst.address(), self.cfg.set_bits,
                    self.cfg.hash_mode).ok()?;
                bank.get(&set)
            },
        }
    }

    fn check_instruction(&self, inst: &BranchInstruction)
        -> Result<(), PredictorError>
    {
        PredictorError::check_len("branch address",
            self.cfg.address_bits, inst.width()
        )
    }

    /// Returns the history register for this branch address, creating it
    /// if necessary.
    fn history_register(&mut self, addr: &BitStr)
        -> Result<&mut ShiftRegister, PredictorError>
    {
        match &mut self.history {
            History::Global(r) => Ok(r),
            History::PerAddress(bank) => bank.read(addr),
            History::PerSet(bank) => {
                let set = hash(addr, self.cfg.set_bits, self.cfg.hash_mode)?;
                bank.read(&set)
            },
        }
    }

    /// Form the key into the pattern history table.
    fn index(&mut self, addr: &BitStr) -> Result<Bits, PredictorError> {
        let history = self.history_register(addr)?.read().to_bitvec();
        let key = match self.variant.index_scheme() {
            IndexScheme::History |
            IndexScheme::SelectedHistory => history,
            IndexScheme::AddressHistory => concat(addr, &history),
            IndexScheme::SetHistory => {
                let set = hash(addr, self.cfg.set_bits, self.cfg.hash_mode)?;
                concat(&set, &history)
            },
        };
        Ok(key)
    }

    /// Make sure the table has an entry for `key`, then copy it into the
    /// counter register.
    fn load_counter(&mut self, key: &BitStr) -> Result<(), PredictorError> {
        let default = bitvec![u8, Msb0; 0; self.cfg.counter_bits];
        self.pht.put_if_absent(key, &default)?;
        self.sc.load(self.pht.get(key)?)
    }
}

impl BranchPredictor for TwoLevelPredictor {
    fn name(&self) -> &'static str { self.variant.name() }

    fn predict(&mut self, inst: &BranchInstruction)
        -> Result<Outcome, PredictorError>
    {
        self.check_instruction(inst)?;
        let key = self.index(inst.address())?;
        self.load_counter(&key)?;

        let prediction = Outcome::from(counter_direction(self.sc.read()));
        trace!("{} predict pc={} key={} ctr={} -> {:?}",
            self.variant, inst, render(&key), self.sc, prediction
        );
        Ok(prediction)
    }

    fn update(&mut self, inst: &BranchInstruction, outcome: Outcome)
        -> Result<(), PredictorError>
    {
        self.check_instruction(inst)?;

        // The key must be formed from history *before* this outcome is
        // shifted in.
        let key = self.index(inst.address())?;
        self.load_counter(&key)?;

        let prev = self.sc.to_string();
        let next = count(self.sc.read(), outcome.is_taken(),
            self.cfg.count_mode)?;
        self.sc.load(&next)?;
        self.pht.put(&key, self.sc.read())?;

        let variant = self.variant;
        let reg = self.history_register(inst.address())?;
        reg.insert(Bit::from(outcome));
        trace!("{} update pc={} key={} ctr={}->{} outcome={:?} {}={}",
            variant, inst, render(&key), prev, render(&next), outcome,
            reg.label(), reg
        );
        Ok(())
    }

    fn monitor(&self) -> String {
        format!("{} predictor snapshot: \n{}{}{}",
            self.variant, self.history.monitor(), self.sc.monitor(),
            self.pht.monitor()
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cfg(history_bits: usize, counter_bits: usize) -> PredictorConfig {
        PredictorConfig {
            history_bits,
            counter_bits,
            address_bits: 8,
            set_bits: 4,
            ..Default::default()
        }
    }

    fn entry(p: &TwoLevelPredictor, key: usize, width: usize) -> String {
        render(p.pht().get(&bits_from_usize(key, width)).unwrap())
    }

    #[test]
    fn gag_learns_from_global_history() {
        let mut p = cfg(2, 2).build(Variant::GAg).unwrap();
        let inst = BranchInstruction::new(0x42, 8);
        let outcomes = [Outcome::T, Outcome::T, Outcome::N, Outcome::T];
        for outcome in outcomes {
            assert_eq!(p.predict(&inst).unwrap(), Outcome::N);
            p.update(&inst, outcome).unwrap();
        }
        assert_eq!(entry(&p, 0b00, 2), "01");
        assert_eq!(entry(&p, 0b01, 2), "01");
        assert_eq!(entry(&p, 0b11, 2), "00");
        assert_eq!(entry(&p, 0b10, 2), "01");
        assert_eq!(p.pht().len(), 4);
        assert_eq!(render(p.history(&inst).unwrap().read()), "01");
    }

    #[test]
    fn gag_history_is_shared() {
        let mut p = cfg(2, 2).build(Variant::GAg).unwrap();
        let a = BranchInstruction::new(0x10, 8);
        let b = BranchInstruction::new(0x20, 8);
        p.predict(&a).unwrap();
        p.update(&a, Outcome::T).unwrap();
        assert_eq!(render(p.history(&b).unwrap().read()), "01");
    }

    #[test]
    fn gap_key_is_address_then_history() {
        let mut p = cfg(2, 2).build(Variant::GAp).unwrap();
        let inst = BranchInstruction::new(0b1010_0101, 8);
        p.predict(&inst).unwrap();
        p.update(&inst, Outcome::T).unwrap();
        assert_eq!(entry(&p, 0b1010_0101_00, 10), "01");
        assert_eq!(p.pht().key_bits(), 10);
    }

    #[test]
    fn pag_history_is_per_address() {
        let mut p = cfg(3, 2).build(Variant::PAg).unwrap();
        let a = BranchInstruction::new(0x10, 8);
        let b = BranchInstruction::new(0x20, 8);
        for _ in 0..2 {
            p.predict(&a).unwrap();
            p.update(&a, Outcome::T).unwrap();
        }
        assert_eq!(render(p.history(&a).unwrap().read()), "011");
        assert!(p.history(&b).is_none());

        // Both branches share the same table
        p.predict(&b).unwrap();
        p.update(&b, Outcome::T).unwrap();
        assert_eq!(entry(&p, 0b000, 3), "10");
    }

    #[test]
    fn pap_tables_are_per_address() {
        let mut p = cfg(2, 2).build(Variant::PAp).unwrap();
        let a = BranchInstruction::new(0x10, 8);
        let b = BranchInstruction::new(0x20, 8);
        p.predict(&a).unwrap();
        p.update(&a, Outcome::T).unwrap();
        p.predict(&b).unwrap();
        p.update(&b, Outcome::N).unwrap();
        assert_eq!(entry(&p, 0x10 << 2, 10), "01");
        assert_eq!(entry(&p, 0x20 << 2, 10), "00");
    }

    #[test]
    fn pas_matches_pag() {
        let mut pag = cfg(3, 2).build(Variant::PAg).unwrap();
        let mut pas = cfg(3, 2).build(Variant::PAs).unwrap();
        let stream = [(0x10, Outcome::T), (0x11, Outcome::N),
            (0x10, Outcome::T), (0x10, Outcome::T), (0x11, Outcome::T)];
        for (pc, outcome) in stream {
            let inst = BranchInstruction::new(pc, 8);
            assert_eq!(pag.predict(&inst).unwrap(), pas.predict(&inst).unwrap());
            pag.update(&inst, outcome).unwrap();
            pas.update(&inst, outcome).unwrap();
        }
        assert!(pag.pht().iter().eq(pas.pht().iter()));
        assert_eq!(pas.pht().capacity_bits(), 4 + 3);
        assert_eq!(pag.pht().capacity_bits(), 3);
    }

    #[test]
    fn sag_history_is_per_set() {
        let mut p = cfg(2, 2).build(Variant::SAg).unwrap();
        // 0x12 and 0x21 fold to the same 4-bit set (0001 ^ 0010)
        let a = BranchInstruction::new(0x12, 8);
        let b = BranchInstruction::new(0x21, 8);
        p.predict(&a).unwrap();
        p.update(&a, Outcome::T).unwrap();
        assert_eq!(render(p.history(&b).unwrap().read()), "01");
        assert!(p.history(&BranchInstruction::new(0x13, 8)).is_none());
    }

    #[test]
    fn sap_and_sas_keys() {
        let inst = BranchInstruction::new(0b0001_0010, 8);

        let mut sap = cfg(2, 2).build(Variant::SAp).unwrap();
        sap.predict(&inst).unwrap();
        sap.update(&inst, Outcome::T).unwrap();
        assert_eq!(entry(&sap, 0b0001_0010_00, 10), "01");

        let mut sas = cfg(2, 2).build(Variant::SAs).unwrap();
        sas.predict(&inst).unwrap();
        sas.update(&inst, Outcome::T).unwrap();
        assert_eq!(entry(&sas, 0b0011_00, 6), "01");
        assert_eq!(sas.pht().key_bits(), 6);
    }

    #[test]
    fn update_uses_pre_shift_history() {
        let mut p = cfg(2, 2).build(Variant::GAg).unwrap();
        let inst = BranchInstruction::new(0, 8);
        for _ in 0..3 {
            p.predict(&inst).unwrap();
            p.update(&inst, Outcome::T).unwrap();
        }
        // Keys 00, 01, 11 each saw exactly one taken outcome
        assert_eq!(entry(&p, 0b00, 2), "01");
        assert_eq!(entry(&p, 0b01, 2), "01");
        assert_eq!(entry(&p, 0b11, 2), "01");

        // A loop on history 11 eventually predicts taken
        p.predict(&inst).unwrap();
        p.update(&inst, Outcome::T).unwrap();
        assert_eq!(p.predict(&inst).unwrap(), Outcome::T);
    }

    #[test]
    fn wrong_address_width() {
        let mut p = cfg(2, 2).build(Variant::PAp).unwrap();
        let inst = BranchInstruction::new(0x10, 6);
        assert_eq!(p.predict(&inst),
            Err(PredictorError::LengthMismatch {
                what: "branch address", expected: 8, found: 6
            })
        );
        assert!(p.update(&inst, Outcome::T).is_err());
        assert!(p.pht().is_empty());
    }

    #[test]
    fn accessors() {
        let mut p = cfg(3, 3).build(Variant::SAp).unwrap();
        assert_eq!(p.variant(), Variant::SAp);
        assert_eq!(p.name(), "SAp");
        assert_eq!(p.config(), &cfg(3, 3));
        assert_eq!(render(p.counter().read()), "000");

        // The working register holds the counter loaded by the last lookup
        let inst = BranchInstruction::new(0x5a, 8);
        for _ in 0..5 {
            p.predict(&inst).unwrap();
            p.update(&inst, Outcome::T).unwrap();
        }
        p.predict(&inst).unwrap();
        assert_eq!(p.counter().label(), "SC");
        assert_eq!(p.counter().len(), 3);
        assert_eq!(render(p.counter().read()), "010");
    }

    #[test]
    fn monitor_snapshot() {
        let mut p = cfg(2, 2).build(Variant::GAg).unwrap();
        let inst = BranchInstruction::new(0, 8);
        p.predict(&inst).unwrap();
        p.update(&inst, Outcome::T).unwrap();
        assert_eq!(p.monitor(),
            "GAg predictor snapshot: \nBHR: 01\nSC: 01\n\
            PHT (1/2^2 entries):\n  00 -> 01\n"
        );
    }
}
