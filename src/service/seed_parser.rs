use std::io::Read;

use csv::{DeserializeRecordsIntoIter, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Accounts every fresh process starts with unless a seed file is given.
pub const DEFAULT_SEED: &str = "\
name,pin,balance
uzma,1234,5000
ahmed,1111,3000
ali,2222,10000
";

#[derive(Debug, Deserialize)]
pub struct SeedRecord {
    pub name: String,
    pub pin: String,
    pub balance: Decimal,
}

/// Parses seed accounts in CSV format (`name,pin,balance`).
pub struct CsvSeedParser<R> {
    iter: DeserializeRecordsIntoIter<R, SeedRecord>,
}

impl<R> CsvSeedParser<R>
where
    R: Read,
{
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(source);

        Self {
            iter: reader.into_deserialize(),
        }
    }
}

impl<R> Iterator for CsvSeedParser<R>
where
    R: Read,
{
    type Item = (u64, csv::Result<SeedRecord>);

    fn next(&mut self) -> Option<Self::Item> {
        let curr_line = self.iter.reader().position().line();
        self.iter.next().map(|row| (curr_line, row))
    }
}
