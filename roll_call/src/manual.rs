/*!

This is the long-form manual for `roll_call` and `hrcnominate`.

## Roll-call files

Each period `P` (a year such as `2012`, or `all` for the aggregate over every
year) is described by three comma-separated files with a header row:

### `<P>-votes.csv`

The vote matrix. The first column holds the identifier of the legislator
(the three-letter country code for the Human Rights Council), the other
columns are the votes, named by the header.

```text
Country,A/HRC/RES/7/1,A/HRC/RES/7/2
CHN,1,0
FRA,2,1
USA,4,0
```

The cells contain the following codes:

| code | meaning                                   |
|------|-------------------------------------------|
| 0    | nay                                       |
| 1    | yea                                       |
| 2    | abstain (missing)                         |
| 3    | present but no vote recorded (missing)    |
| 4    | not a member when the vote took place     |

Any other value makes the whole period invalid.

### `<P>-legis-data.csv`

One row per row of the vote matrix, in the same order. The first column is the
identifier, the other columns are free. The exporter writes
`Country,Country Long,party`.

### `<P>-vote-data.csv`

One row per column of the vote matrix, in the same order. The exporter writes
`Resolution,Date,Summary`.

## Selecting periods

`hrcnominate analyze` walks the years from `firstPeriod` to `lastPeriod`,
skipping the ones listed in `excludedPeriods` without reading them. A year is
also left out, with a message, when its files cannot be read or are
inconsistent, or when it has fewer than `minVotes` votes. The `all` files are
always required.

## Configuration

The analysis is controlled by a JSON file:

```text
{
  "inputDirectory": "output/240101-120000",
  "outputDirectory": "results",
  "firstPeriod": 2006,
  "lastPeriod": 2023,
  "excludedPeriods": [2006],
  "minVotes": 20,
  "dimensions": 2,
  "polarityAnchors": ["USA", "USA"],
  "dynamicDimensions": 1,
  "dynamicModel": 1,
  "axisTitles": ["Economic", "Social"],
  "staticEstimator": { "program": "Rscript", "args": ["scripts/wnominate.R"] },
  "dynamicEstimator": { "program": "Rscript", "args": ["scripts/dwnominate.R"] }
}
```

Relative directories are resolved against the location of the configuration
file. `outputDirectory` defaults to the input directory. `dimensions` (1 or 2)
needs as many `polarityAnchors`; the dynamic estimation uses the first anchor.
`dynamicModel` is 0 (constant), 1 (linear), 2 (quadratic) or 3 (cubic).
When an estimator is not configured, the corresponding step is skipped.

## Estimators

The estimators are external programs. Each run gets a fresh directory with:
- `input/<P>-votes.csv`, `input/<P>-legis-data.csv`, `input/<P>-vote-data.csv`
  for every period of the estimation (`all` for the static estimation)
- `request.json` with the fields `kind` (`static` or `dynamic`), `dimensions`,
  `minVotes`, `polarity`, `model`, `periods`, `inputDirectory`, `outputFile`.

The path of `request.json` is passed as the last argument of the command. The
program must write `outputFile` as CSV with the header
`legislator,period,coord1D,coord2D,se1D,se2D`. `period` is empty for the static
estimation; absent values are empty or `NA`.

## Outputs

- `static-1d.svg`: first dimension of the static estimation, with standard errors
- `static-2d.svg`: both dimensions (only with `dimensions: 2`)
- `dynamic.svg`: first dimension of every legislator across the periods
- `coordinates.csv`: `,coord1D,se1D` with one row per legislator, sorted by `coord1D`

## Records

`hrcnominate export`, `sessions` and `sheet` read the voting records, either
from a directory with three CSV files or from an Excel workbook with three
sheets of the same names:

- `resolutions`: `name,vote_date,summary,agenda` (`vote_date` as `YYYY/MM/DD`)
- `votes`: `resolution_name,country_short,vote` (`vote` is `Y`, `N`, `A` or `.`)
- `countries`: `country_short,country_long,category`

Countries whose code is not three letters long are ignored, as are repeated
resolutions and repeated votes. An empty vote counts as no vote. In a
workbook, `vote_date` may also be a date cell.

`export` writes to `output/<yymmdd-HHMMSS>` (followed by the keywords given
with `--match`, joined with dashes) when `--out` is not given.

`sheet` writes one row per resolution, sorted by date:
`Name,Start of Session,Date,Summary,Agenda,Passed,Yes,No,Abstain,Missing`,
then for every category (in the order of the country table) an empty cell,
the category name and the vote of each of its countries, sorted by code.

 */
