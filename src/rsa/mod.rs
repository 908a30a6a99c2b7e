use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod arith;
pub mod codec;
pub mod config;
pub mod error;
pub mod keys;
pub mod pipeline;
pub mod prime_gen;

use arith::mod_pow;
use config::*;
use error::RsaError;
use keys::*;
use pipeline::*;
use prime_gen::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Generate,
    Write,
    Read,
    Test,
}

#[macro_export]
macro_rules! mini_rsa_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
#[clap(version, about = "Textbook RSA key generation and chunked cipher files")]
pub struct $NAME {
    #[clap(short, long, value_parser = ["generate", "write", "read", "test"], default_value = $CONFIG.mode.as_str(), help = "Run mode")]
    pub mode: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.key.as_str(), help = "Key name, generate/detect `key.pub' and `key.pvt'")]
    pub key: String,
    #[clap(long, value_parser, default_value = $CONFIG.primes.as_str(), help = "Primes file to pick factors from")]
    pub primes: String,
    #[clap(short = 'p', long = "prime-p", value_parser, help = "Use this prime for p instead of picking one")]
    pub p: Option<u64>,
    #[clap(short = 'q', long = "prime-q", value_parser, help = "Use this prime for q instead of picking one")]
    pub q: Option<u64>,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.seed, help = "Seed for picking primes, defaults to the current time")]
    pub seed: u64,
    #[clap(short, long, value_parser, help = "Cipher file to write (write mode) or read (read mode)")]
    pub cipher: Option<String>,
    #[clap(value_parser, help = "Plaintext file, stdin for write mode and stdout for read mode when absent")]
    pub plain: Option<String>,
    #[clap(long, value_parser, default_value_t = $CONFIG.retries, help = "Times to pick a new q after an overflowing modulus")]
    pub retries: usize,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.verbose, help = "Verbose output")]
    pub verbose: bool,
    #[clap(long, value_parser, default_value_t = $CONFIG.progress, help = "Show a progress bar on stderr")]
    pub progress: bool,
}
    };
}

mini_rsa_t!(CONFIG_DEF, MiniRsa);

/// Codes checked by `test` mode on top of the smallest ones.
const TEST_SAMPLES: usize = 1000;

impl MiniRsa {
    fn run_mode(&self) -> anyhow::Result<RunMode> {
        Ok(match self.mode.as_str() {
            "generate" => RunMode::Generate,
            "write" => RunMode::Write,
            "read" => RunMode::Read,
            "test" => RunMode::Test,
            m => bail!("unknown run mode `{m}`, available: generate(default), write, read, test"),
        })
    }

    fn cipher_path(&self) -> anyhow::Result<&str> {
        self.cipher.as_deref().context("missing cipher file, pass it with `--cipher'")
    }

    /// Explicit primes are used as given; missing ones are picked from the
    /// primes file with a generator seeded by `seed`.
    pub fn generate_key(&self) -> Result<KeySet, RsaError> {
        if let (Some(p), Some(q)) = (self.p, self.q) {
            return generate_key_set(p, q, self.retries, || None, self.verbose);
        }
        let list = PrimeList::load(&self.primes)?;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let p = self.p.unwrap_or_else(|| list.pick(&mut rng));
        let q = self.q.unwrap_or_else(|| list.pick(&mut rng));
        generate_key_set(p, q, self.retries, || Some(list.pick(&mut rng)), self.verbose)
    }

    /// Encrypts then decrypts sample codes below the modulus, returning the
    /// first code that does not survive.
    pub fn round_trip(keys: &KeySet, rng: &mut impl Rng, samples: usize) -> Option<u64> {
        let n = keys.public.modulus;
        let small = 0..n.min(samples as u64);
        let random = (0..samples).map(|_| rng.gen_range(0..n)).collect::<Vec<_>>();
        small.chain(random).find(|&m| {
            let c = mod_pow(m, keys.public.exponent, n);
            mod_pow(c, keys.private.exponent, keys.private.modulus) != m
        })
    }

    /// `-v` opens every level, including the arithmetic and codec traces.
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose { LevelFilter::Trace } else { LevelFilter::Warn }
    }

    pub fn run(&self) -> anyhow::Result<()> {
        self.run_with(&mut io::stdin().lock(), &mut io::stdout().lock())
    }

    /// Runs with `input`/`output` standing in for a missing plaintext file:
    /// `write` encrypts `input`, `read` decrypts into `output`.
    pub fn run_with(&self, input: &mut dyn Read, output: &mut dyn Write) -> anyhow::Result<()> {
        match self.run_mode()? {
            RunMode::Generate => {
                let keys = self.generate_key()?;
                log::debug!("get keys: {:?}", keys);
                let pair = KeyPair::from(self.key.clone());
                pair.save(&keys)?;
                log::info!("generated key files: {}, {}",
                    KeyPair::private_path(&self.key), KeyPair::public_path(&self.key));
            }
            RunMode::Write => {
                let cipher = self.cipher_path()?;
                let key = read_key(&KeyPair::public_path(&self.key))?;
                let mut file_reader;
                let mut len = None;
                let reader: &mut dyn Read = match &self.plain {
                    None => input,
                    Some(f) => {
                        let file = File::open(f).with_context(|| format!("cannot open plaintext `{f}`"))?;
                        len = file.metadata().ok().map(|m| m.len());
                        file_reader = BufReader::new(file);
                        &mut file_reader
                    }
                };
                let file = File::create(cipher).with_context(|| format!("cannot create cipher file `{cipher}`"))?;
                let mut writer = BufWriter::new(file);
                let pb = progress_bar(len, self.progress);
                let blocks = write_cipher(reader, &mut writer, &key, self.verbose, &pb)?;
                pb.finish_and_clear();
                log::info!("wrote {} blocks to `{}`", blocks, cipher);
            }
            RunMode::Read => {
                let cipher = self.cipher_path()?;
                let key = read_key(&KeyPair::private_path(&self.key))?;
                let file = File::open(cipher).with_context(|| format!("cannot open cipher file `{cipher}`"))?;
                let len = file.metadata()?.len();
                if len % BLOCK_SIZE as u64 != 0 {
                    return Err(RsaError::CipherLength(len)).with_context(|| format!("cipher file `{cipher}`"));
                }
                let mut reader = BufReader::new(file);
                let mut file_writer;
                let writer: &mut dyn Write = match &self.plain {
                    None => output,
                    Some(f) => {
                        let file = File::create(f).with_context(|| format!("cannot create plaintext `{f}`"))?;
                        file_writer = BufWriter::new(file);
                        &mut file_writer
                    }
                };
                let pb = progress_bar(Some(len), self.progress);
                let blocks = read_cipher(&mut reader, writer, &key, self.verbose, &pb)?;
                pb.finish_and_clear();
                log::info!("read {} blocks from `{}`", blocks, cipher);
            }
            RunMode::Test => {
                let keys = KeyPair::from(self.key.clone()).load()?;
                log::debug!("get keys: {:?}", keys);
                if keys.public.modulus <= u32::MAX as u64 {
                    log::warn!("modulus {} cannot carry every {} byte chunk", keys.public.modulus, CHUNK_SIZE);
                }
                let mut rng = StdRng::seed_from_u64(self.seed);
                if let Some(m) = MiniRsa::round_trip(&keys, &mut rng, TEST_SAMPLES) {
                    bail!("key pair `{}` does not round trip code {}", self.key, m);
                }
                writeln!(output, "Test pass")?;
            }
        }
        Ok(())
    }
}
